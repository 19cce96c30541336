//! Agent-state snapshots.
//!
//! A [`DrivingAgentState`] is everything needed to kinematically describe
//! one agent at one instant, stored as named constants in a
//! [`ParameterMap`].  Scene states create a fresh snapshot per agent per
//! tick; the next-tick snapshot starts with the agent's time-invariant
//! constants only and is filled in by the controller and the integrator.

use glam::DVec2;
use sc_core::{Duration, Time};

use crate::name::{qualifier, quantity};
use crate::{AgentError, AgentResult, Constant, ParamKind, ParamValue, ParameterMap, QualifiedName};

// ── KinematicField ────────────────────────────────────────────────────────────

/// The time-varying quantities the simulator produces for every agent.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum KinematicField {
    Position,
    LinearVelocity,
    AlignedLinearVelocity,
    LinearAcceleration,
    AlignedLinearAcceleration,
    ExternalLinearAcceleration,
    Rotation,
    Steer,
    AngularVelocity,
}

impl KinematicField {
    pub const ALL: [KinematicField; 9] = [
        KinematicField::Position,
        KinematicField::LinearVelocity,
        KinematicField::AlignedLinearVelocity,
        KinematicField::LinearAcceleration,
        KinematicField::AlignedLinearAcceleration,
        KinematicField::ExternalLinearAcceleration,
        KinematicField::Rotation,
        KinematicField::Steer,
        KinematicField::AngularVelocity,
    ];

    pub fn quantity(self) -> &'static str {
        match self {
            KinematicField::Position                   => quantity::POSITION,
            KinematicField::LinearVelocity             => quantity::LINEAR_VELOCITY,
            KinematicField::AlignedLinearVelocity      => quantity::ALIGNED_LINEAR_VELOCITY,
            KinematicField::LinearAcceleration         => quantity::LINEAR_ACCELERATION,
            KinematicField::AlignedLinearAcceleration  => quantity::ALIGNED_LINEAR_ACCELERATION,
            KinematicField::ExternalLinearAcceleration => quantity::LINEAR_ACCELERATION,
            KinematicField::Rotation                   => quantity::ROTATION,
            KinematicField::Steer                      => quantity::STEER,
            KinematicField::AngularVelocity            => quantity::ANGULAR_VELOCITY,
        }
    }

    pub fn qualifier(self) -> &'static str {
        match self {
            KinematicField::ExternalLinearAcceleration => qualifier::EXTERNAL,
            KinematicField::AlignedLinearAcceleration
            | KinematicField::Steer                    => qualifier::INDIRECT_ACTUATION,
            _                                          => qualifier::BASE,
        }
    }

    pub fn kind(self) -> ParamKind {
        match self {
            KinematicField::Position
            | KinematicField::LinearVelocity
            | KinematicField::LinearAcceleration
            | KinematicField::ExternalLinearAcceleration => ParamKind::Vector,
            _ => ParamKind::Scalar,
        }
    }

    pub fn name_for(self, agent: &str) -> QualifiedName {
        QualifiedName::new(agent, self.quantity(), self.qualifier())
    }

    /// Reverse lookup from `<quantity>.<qualifier>`.
    pub fn from_key(quantity: &str, qualifier: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.quantity() == quantity && f.qualifier() == qualifier)
    }
}

// ── Kinematics ────────────────────────────────────────────────────────────────

/// Plain-value view of all kinematic fields of one snapshot.
#[derive(Copy, Clone, PartialEq, Debug, Default)]
pub struct Kinematics {
    pub position:                     DVec2,
    pub linear_velocity:              DVec2,
    pub aligned_linear_velocity:      f64,
    pub linear_acceleration:          DVec2,
    pub aligned_linear_acceleration:  f64,
    pub external_linear_acceleration: DVec2,
    pub rotation:                     f64,
    pub steer:                        f64,
    pub angular_velocity:             f64,
}

impl Kinematics {
    /// A vehicle moving straight along its heading at constant `speed`.
    ///
    /// Vector and aligned fields are kept consistent: the velocity vector is
    /// `speed` along `rotation`, accelerations are zero.
    pub fn cruising(position: DVec2, rotation: f64, speed: f64) -> Self {
        let heading = DVec2::from_angle(rotation);
        Self {
            position,
            linear_velocity: heading * speed,
            aligned_linear_velocity: speed,
            rotation,
            ..Self::default()
        }
    }

    pub fn value(&self, field: KinematicField) -> ParamValue {
        match field {
            KinematicField::Position                   => ParamValue::Vector(self.position),
            KinematicField::LinearVelocity             => ParamValue::Vector(self.linear_velocity),
            KinematicField::AlignedLinearVelocity      => ParamValue::Scalar(self.aligned_linear_velocity),
            KinematicField::LinearAcceleration         => ParamValue::Vector(self.linear_acceleration),
            KinematicField::AlignedLinearAcceleration  => ParamValue::Scalar(self.aligned_linear_acceleration),
            KinematicField::ExternalLinearAcceleration => ParamValue::Vector(self.external_linear_acceleration),
            KinematicField::Rotation                   => ParamValue::Scalar(self.rotation),
            KinematicField::Steer                      => ParamValue::Scalar(self.steer),
            KinematicField::AngularVelocity            => ParamValue::Scalar(self.angular_velocity),
        }
    }
}

// ── DrivingAgentState ─────────────────────────────────────────────────────────

/// One agent at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct DrivingAgentState {
    name:      String,
    time:      Time,
    params:    ParameterMap,
    /// Set once every kinematic field for `time` has been produced (by the
    /// simulator or exogenously).
    populated: bool,
}

impl DrivingAgentState {
    pub fn new(name: impl Into<String>, time: Time) -> Self {
        Self {
            name: name.into(),
            time,
            params: ParameterMap::new(),
            populated: false,
        }
    }

    /// A copy of this snapshot's constant parameters for `time`, with every
    /// kinematic field and the TTC value cleared.  A TTC placeholder present
    /// here is kept as a placeholder.
    pub fn next_template(&self, time: Time) -> Self {
        let params = self
            .params
            .iter()
            .filter(|c| KinematicField::from_key(c.name().quantity(), c.name().qualifier()).is_none())
            .map(|c| {
                if c.name().quantity() == quantity::TTC {
                    Constant::new(c.name().clone(), ParamValue::Duration(Duration::MAX))
                } else {
                    c.clone()
                }
            })
            .collect();
        Self {
            name: self.name.clone(),
            time,
            params,
            populated: false,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn time(&self) -> Time {
        self.time
    }

    #[inline]
    pub fn params(&self) -> &ParameterMap {
        &self.params
    }

    #[inline]
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    #[inline]
    pub fn set_populated(&mut self, populated: bool) {
        self.populated = populated;
    }

    fn full_name(&self, quantity: &str, qualifier: &str) -> String {
        format!("{}.{}.{}", self.name, quantity, qualifier)
    }

    // ── Generic access ────────────────────────────────────────────────────

    /// Store a parameter of this agent, replacing any previous value.
    pub fn set_param(&mut self, quantity: &str, qualifier: &str, value: ParamValue) -> AgentResult<()> {
        let name = QualifiedName::new(self.name.clone(), quantity, qualifier);
        self.params.insert(Constant::new(name, value)).map(|_| ())
    }

    pub fn param(&self, quantity: &str, qualifier: &str) -> Option<&Constant> {
        self.params.get(&self.full_name(quantity, qualifier))
    }

    pub fn param_value(&self, quantity: &str, qualifier: &str, kind: ParamKind) -> AgentResult<ParamValue> {
        self.params.value(&self.full_name(quantity, qualifier), kind)
    }

    /// Store any constant, e.g. one copied from a source agent.  The
    /// constant must belong to this agent.
    pub fn insert(&mut self, constant: Constant) -> AgentResult<()> {
        if constant.name().agent() != self.name {
            return Err(AgentError::InvalidName(constant.name().full()));
        }
        self.params.insert(constant).map(|_| ())
    }

    // ── Kinematic fields ──────────────────────────────────────────────────

    pub fn get(&self, field: KinematicField) -> AgentResult<ParamValue> {
        self.param_value(field.quantity(), field.qualifier(), field.kind())
    }

    pub fn has(&self, field: KinematicField) -> bool {
        self.param(field.quantity(), field.qualifier()).is_some()
    }

    /// Replace `field` with a fresh constant holding `value`.
    pub fn set(&mut self, field: KinematicField, value: ParamValue) -> AgentResult<()> {
        if value.kind() != field.kind() {
            return Err(AgentError::TypeMismatch {
                name:     self.full_name(field.quantity(), field.qualifier()),
                expected: field.kind(),
                found:    value.kind(),
            });
        }
        self.set_param(field.quantity(), field.qualifier(), value)
    }

    pub fn scalar(&self, field: KinematicField) -> AgentResult<f64> {
        self.get(field).map(|v| v.as_scalar().unwrap_or_default())
    }

    pub fn vector(&self, field: KinematicField) -> AgentResult<DVec2> {
        self.get(field).map(|v| v.as_vector().unwrap_or_default())
    }

    pub fn set_scalar(&mut self, field: KinematicField, value: f64) -> AgentResult<()> {
        self.set(field, ParamValue::Scalar(value))
    }

    pub fn set_vector(&mut self, field: KinematicField, value: DVec2) -> AgentResult<()> {
        self.set(field, ParamValue::Vector(value))
    }

    /// All kinematic fields at once.  Fails on the first missing one.
    pub fn kinematics(&self) -> AgentResult<Kinematics> {
        Ok(Kinematics {
            position:                     self.vector(KinematicField::Position)?,
            linear_velocity:              self.vector(KinematicField::LinearVelocity)?,
            aligned_linear_velocity:      self.scalar(KinematicField::AlignedLinearVelocity)?,
            linear_acceleration:          self.vector(KinematicField::LinearAcceleration)?,
            aligned_linear_acceleration:  self.scalar(KinematicField::AlignedLinearAcceleration)?,
            external_linear_acceleration: self.vector(KinematicField::ExternalLinearAcceleration)?,
            rotation:                     self.scalar(KinematicField::Rotation)?,
            steer:                        self.scalar(KinematicField::Steer)?,
            angular_velocity:             self.scalar(KinematicField::AngularVelocity)?,
        })
    }

    pub fn set_kinematics(&mut self, kinematics: &Kinematics) -> AgentResult<()> {
        for field in KinematicField::ALL {
            self.set(field, kinematics.value(field))?;
        }
        Ok(())
    }

    // ── Constant parameters ───────────────────────────────────────────────

    pub fn bb_length(&self) -> AgentResult<f64> {
        self.constant_scalar(quantity::BB_LENGTH)
    }

    pub fn bb_width(&self) -> AgentResult<f64> {
        self.constant_scalar(quantity::BB_WIDTH)
    }

    fn constant_scalar(&self, quantity: &str) -> AgentResult<f64> {
        self.param_value(quantity, qualifier::BASE, ParamKind::Scalar)
            .map(|v| v.as_scalar().unwrap_or_default())
    }

    /// `true` if the agent's configuration asks for a time-to-collision
    /// diagnostic.
    pub fn has_ttc_slot(&self) -> bool {
        self.param(quantity::TTC, qualifier::BASE).is_some()
    }

    pub fn ttc(&self) -> Option<Duration> {
        self.param(quantity::TTC, qualifier::BASE)
            .and_then(|c| c.value().as_duration())
    }

    pub fn set_ttc(&mut self, ttc: Duration) -> AgentResult<()> {
        self.set_param(quantity::TTC, qualifier::BASE, ParamValue::Duration(ttc))
    }
}
