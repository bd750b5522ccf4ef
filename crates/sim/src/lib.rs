/// Lifecycle of a round. `Running` is the only phase in which the model
/// moves; the other three latch until `reset`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Running,
    /// Meltdown: temperature reached the trip threshold.
    Critical,
    /// Sustained under-temperature after the startup grace period.
    Stalled,
    /// Voluntary emergency shutdown; accumulated points are kept.
    Shutdown,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Phase::Running)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct ReactorParams {
    /// Power acceleration per unit of rod offset from center [1/s²]
    pub rod_accel_gain: f64,
    /// Rod sink rate when nobody lifts them [units/s]
    pub rod_gravity: f64,
    /// Rod travel per `adjust_rod` call at direction 1.0
    pub rod_step: f64,
    /// Multiplicative velocity decay, applied once per `update` call
    pub velocity_damping: f64,
    /// Power change per unit of velocity per second
    pub power_gain: f64,
    /// Temperature floor; also the stall threshold [°C]
    pub temp_floor_c: f64,
    /// Equilibrium temperature slope [°C per % power]
    pub temp_per_power: f64,
    /// First-order lag coefficient toward equilibrium [1/s]
    pub temp_lag: f64,
    /// Below this power, extra cooling pulls the core down
    pub low_power_cutoff: f64,
    /// Meltdown threshold [°C]
    pub trip_temp_c: f64,
    /// Stall check is suppressed until `time_running` exceeds this [s]
    pub stall_grace_s: f64,
    /// Points per multiplier-second
    pub points_rate: f64,
}

impl Default for ReactorParams {
    fn default() -> Self {
        Self {
            rod_accel_gain: 0.4,
            rod_gravity: 10.0,
            rod_step: 0.25,
            velocity_damping: 0.995,
            power_gain: 2.5,
            temp_floor_c: 300.0,
            temp_per_power: 7.0,
            temp_lag: 0.5,
            low_power_cutoff: 20.0,
            trip_temp_c: 1000.0,
            stall_grace_s: 2.0,
            points_rate: 10.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReactorState {
    /// 0 = fully inserted, 100 = fully withdrawn
    pub rod_position: f64,
    /// 0..=150 power output percentage
    pub power: f64,
    pub power_velocity: f64,
    /// Core temperature [°C]; floored at `temp_floor_c`, never capped above
    pub temperature: f64,
    pub points: f64,
    /// Simulated seconds spent in `Running`
    pub time_running: f64,
    pub phase: Phase,
}

impl Default for ReactorState {
    fn default() -> Self {
        Self {
            rod_position: 50.0,
            power: 50.0,
            power_velocity: 0.0,
            temperature: 400.0,
            points: 0.0,
            time_running: 0.0,
            phase: Phase::Running,
        }
    }
}

impl ReactorState {
    /// Euler step of the control loop:
    /// rod offset → power velocity → power → temperature → score.
    ///
    /// Callers must pass `dt_s >= 0` and never call this re-entrantly.
    /// A no-op once the phase is terminal.
    pub fn update(&mut self, p: &ReactorParams, dt_s: f64) {
        if self.phase != Phase::Running {
            return;
        }

        // Rod offset from center drives power momentum. The offset is
        // sampled before gravity moves the rod this tick.
        let accel = (self.rod_position - 50.0) * p.rod_accel_gain;
        self.power_velocity += accel * dt_s;

        // Rods sink on their own; holding altitude costs input.
        self.rod_position = (self.rod_position - p.rod_gravity * dt_s).clamp(0.0, 100.0);

        // Damping is per call, not per second: faster tick loops damp
        // harder. Kept as-is, the tuning depends on it.
        self.power_velocity *= p.velocity_damping;

        self.power = (self.power + self.power_velocity * p.power_gain * dt_s).clamp(0.0, 150.0);

        // First-order lag toward the equilibrium temperature for this power
        // level, with an extra pull-down when the core is barely producing.
        let target_temp = p.temp_floor_c + self.power * p.temp_per_power;
        let mut temp_change = (target_temp - self.temperature) * p.temp_lag * dt_s;
        if self.power < p.low_power_cutoff {
            temp_change -= (p.low_power_cutoff - self.power) * p.temp_lag * dt_s;
        }
        self.temperature = (self.temperature + temp_change).max(p.temp_floor_c);

        // Critical is checked before Stalled: one oversized dt can cross
        // both thresholds in the same tick, and meltdown wins.
        if self.temperature >= p.trip_temp_c {
            self.phase = Phase::Critical;
            return;
        }
        if self.temperature <= p.temp_floor_c && self.time_running > p.stall_grace_s {
            self.phase = Phase::Stalled;
            return;
        }

        let multiplier = self.score_multiplier(p);
        if multiplier > 0.0 {
            self.points += multiplier * dt_s * p.points_rate;
        }

        self.time_running += dt_s;
    }

    /// Move the rods by `direction * rod_step`. Direction is -1/0/+1 from
    /// key input or a continuous value from an autopilot; call at most once
    /// per active direction per tick, repeated calls compound.
    pub fn adjust_rod(&mut self, p: &ReactorParams, direction: f64) {
        if self.phase == Phase::Shutdown {
            return;
        }
        self.rod_position = (self.rod_position + direction * p.rod_step).clamp(0.0, 100.0);
    }

    /// Drop the rods and freeze the round, keeping the score. Only effective
    /// while `Running`; meaningless after a meltdown or stall.
    pub fn emergency_shutdown(&mut self) {
        if self.phase != Phase::Running {
            return;
        }
        self.phase = Phase::Shutdown;
        self.rod_position = 0.0;
        self.power_velocity = 0.0;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Cubic risk-reward curve: 0 at the temperature floor, 100 at the trip
    /// threshold. Read-only, usable for gauge display.
    pub fn score_multiplier(&self, p: &ReactorParams) -> f64 {
        if self.temperature <= p.temp_floor_c {
            return 0.0;
        }
        let temp_ratio = (self.temperature - p.temp_floor_c) / (p.trip_temp_c - p.temp_floor_c);
        temp_ratio.powi(3) * 100.0
    }
}
