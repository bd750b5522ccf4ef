use sim::ReactorState;

#[derive(Clone, Copy, Debug)]
pub struct RodPilotConfig {
    /// Temperature the pilot tries to hold [°C]
    pub target_temp_c: f64,
    /// Rod-setpoint offset per °C of temperature error
    pub temp_gain: f64,
    /// Rod-setpoint offset per unit of power velocity (damping term)
    pub velocity_gain: f64,
    pub kp: f64,
    pub ki: f64,
    pub out_min: f64,
    pub out_max: f64,
}

impl Default for RodPilotConfig {
    fn default() -> Self {
        Self {
            target_temp_c: 800.0,
            temp_gain: 0.1,
            velocity_gain: 3.0,
            kp: 0.2,
            ki: 0.05,
            out_min: -1.0,
            out_max: 1.0,
        }
    }
}

/// Cascaded rod autopilot: temperature error and power momentum pick a rod
/// setpoint, a PI loop on the rod error emits a direction for `adjust_rod`.
#[derive(Clone, Debug)]
pub struct RodPilot {
    cfg: RodPilotConfig,
    integral: f64,
}

impl RodPilot {
    pub fn new(cfg: RodPilotConfig) -> Self {
        Self { cfg, integral: 0.0 }
    }

    pub fn reset(&mut self) {
        self.integral = 0.0;
    }

    /// Compute the rod direction for this tick. Returns a saturated value in
    /// [out_min, out_max]; feed it to `adjust_rod` once per tick.
    pub fn update(&mut self, state: &ReactorState, dt_s: f64) -> f64 {
        // Below target: lift the setpoint above center to accelerate.
        // Rising power momentum pulls the setpoint back down early, before
        // the temperature lag catches up.
        let rod_setpoint = (50.0 + self.cfg.temp_gain * (self.cfg.target_temp_c - state.temperature)
            - self.cfg.velocity_gain * state.power_velocity)
            .clamp(0.0, 100.0);

        let error = rod_setpoint - state.rod_position;
        self.integral += error * dt_s;

        let mut out = self.cfg.kp * error + self.cfg.ki * self.integral;

        // Saturate output + simple anti-windup by bleeding the integral
        // while pushing further into the limit.
        if out > self.cfg.out_max {
            out = self.cfg.out_max;
            if error > 0.0 {
                self.integral *= 0.98;
            }
        } else if out < self.cfg.out_min {
            out = self.cfg.out_min;
            if error < 0.0 {
                self.integral *= 0.98;
            }
        }

        out
    }
}
