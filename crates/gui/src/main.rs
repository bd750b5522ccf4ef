use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};
use highscore::{FileScoreStore, ScoreStore};
use pilot::{RodPilot, RodPilotConfig};
use sim::{Phase, ReactorParams, ReactorState};

const MAX_SAMPLES: usize = 4096;

#[derive(Clone, Copy, Debug)]
struct Sample {
    t: f64,
    temp: f64,
    power: f64,
    rod: f64,
}

struct App {
    params: ReactorParams,
    reactor: ReactorState,
    t: f64,
    samples: Vec<Sample>,

    assist: bool,
    autopilot: RodPilot,

    store: FileScoreStore,
    high_score: u64,
    banked: bool,
    new_record: bool,
    last_error: Option<String>,

    // Held state of the on-screen rod buttons, sampled while drawing the
    // previous frame's panel.
    lift_held: bool,
    drop_held: bool,
}

impl App {
    fn new() -> Self {
        let path = std::env::var("REACTOR_ARCADE_SCORES")
            .unwrap_or_else(|_| "reactor_arcade_scores.json".to_string());
        let store = FileScoreStore::new(path);
        let (high_score, last_error) = match store.load() {
            Ok(s) => (s, None),
            Err(e) => (0, Some(format!("Failed to load high score: {e}"))),
        };

        Self {
            params: ReactorParams::default(),
            reactor: ReactorState::default(),
            t: 0.0,
            samples: Vec::new(),
            assist: false,
            autopilot: RodPilot::new(RodPilotConfig::default()),
            store,
            high_score,
            banked: false,
            new_record: false,
            last_error,
            lift_held: false,
            drop_held: false,
        }
    }

    fn reset_round(&mut self) {
        self.reactor.reset();
        self.autopilot.reset();
        self.t = 0.0;
        self.samples.clear();
        self.banked = false;
        self.new_record = false;
    }

    /// Called once per finished round; compares against the stored record.
    fn bank_round(&mut self) {
        if self.banked {
            return;
        }
        self.banked = true;

        match highscore::bank(&mut self.store, self.reactor.points) {
            Ok(Some(record)) => {
                self.high_score = record;
                self.new_record = true;
            }
            Ok(None) => {}
            Err(e) => self.last_error = Some(format!("Failed to save high score: {e}")),
        }
    }

    fn step(&mut self, ctx: &egui::Context) {
        // Frame delta, capped so a dragged or suspended window cannot slam
        // the model across both terminal thresholds at once.
        let dt_s = (ctx.input(|i| i.stable_dt).min(0.1)) as f64;

        let lift = self.lift_held
            || ctx.input(|i| i.key_down(egui::Key::ArrowUp) || i.key_down(egui::Key::W));
        let drop = self.drop_held
            || ctx.input(|i| i.key_down(egui::Key::ArrowDown) || i.key_down(egui::Key::S));

        // One adjust_rod per active direction per frame
        if self.assist {
            let dir = self.autopilot.update(&self.reactor, dt_s);
            self.reactor.adjust_rod(&self.params, dir);
        } else if lift && !drop {
            self.reactor.adjust_rod(&self.params, 1.0);
        } else if drop && !lift {
            self.reactor.adjust_rod(&self.params, -1.0);
        }

        self.reactor.update(&self.params, dt_s);
        self.t += dt_s;

        self.samples.push(Sample {
            t: self.t,
            temp: self.reactor.temperature,
            power: self.reactor.power,
            rod: self.reactor.rod_position,
        });
        if self.samples.len() > MAX_SAMPLES {
            let excess = self.samples.len() - MAX_SAMPLES;
            self.samples.drain(..excess);
        }
    }

    fn phase_badge(&self) -> (egui::Color32, &'static str) {
        match self.reactor.phase {
            Phase::Running => (egui::Color32::GREEN, "RUNNING"),
            Phase::Critical => (egui::Color32::RED, "MELTDOWN"),
            Phase::Stalled => (egui::Color32::LIGHT_BLUE, "STALLED"),
            Phase::Shutdown => (egui::Color32::YELLOW, "SHUT DOWN"),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::R)) {
            self.reset_round();
        }
        if ctx.input(|i| i.key_pressed(egui::Key::Space)) {
            self.reactor.emergency_shutdown();
        }

        if self.reactor.phase == Phase::Running {
            self.step(ctx);
            ctx.request_repaint();
        }
        if self.reactor.phase != Phase::Running {
            self.bank_round();
        }

        let (badge_color, badge_text) = self.phase_badge();

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Reactor Arcade");
                ui.separator();
                ui.colored_label(badge_color, badge_text);
                ui.separator();
                ui.label(format!("score: {}", self.reactor.points.floor()));
                ui.separator();
                ui.label(format!("best: {}", self.high_score));
                if self.new_record {
                    ui.separator();
                    ui.colored_label(egui::Color32::GOLD, "NEW RECORD");
                }
            });
        });

        egui::SidePanel::left("left")
            .resizable(false)
            .show(ctx, |ui| {
                ui.label("Core");
                ui.monospace(format!("rod       {:6.1}", self.reactor.rod_position));
                ui.monospace(format!("power     {:6.1} %", self.reactor.power));
                ui.monospace(format!("velocity  {:6.1}", self.reactor.power_velocity));
                ui.monospace(format!("temp      {:6.1} °C", self.reactor.temperature));
                ui.monospace(format!(
                    "reward    {:6.2}x",
                    self.reactor.score_multiplier(&self.params)
                ));
                ui.monospace(format!("time      {:6.1} s", self.reactor.time_running));

                ui.separator();

                let lift = ui.button("Lift rods (hold)");
                self.lift_held = lift.is_pointer_button_down_on();
                let drop = ui.button("Drop rods (hold)");
                self.drop_held = drop.is_pointer_button_down_on();

                if ui.button("SCRAM (bank score)").clicked() {
                    self.reactor.emergency_shutdown();
                }
                if ui.button("New round").clicked() {
                    self.reset_round();
                }

                ui.checkbox(&mut self.assist, "Autopilot assist");

                ui.separator();
                ui.small("Hold ↑/W to lift, ↓/S to drop.");
                ui.small("Space banks the score, R starts over.");
                ui.small("Trip at 1000 °C. Stall at 300 °C.");

                if let Some(err) = &self.last_error {
                    ui.separator();
                    ui.colored_label(egui::Color32::RED, err);
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.samples.is_empty() {
                ui.label("Starting up…");
                return;
            }

            let t0 = self.samples.first().map(|s| s.t).unwrap_or(0.0);
            let t_end = self.samples.last().map(|s| s.t).unwrap_or(0.0);

            let temp_points: PlotPoints = self.samples.iter().map(|s| [s.t, s.temp]).collect();
            let power_points: PlotPoints = self.samples.iter().map(|s| [s.t, s.power]).collect();
            let rod_points: PlotPoints = self.samples.iter().map(|s| [s.t, s.rod]).collect();

            ui.heading("Temperature");
            Plot::new("temp_plot").height(260.0).show(ui, |plot_ui| {
                plot_ui.line(Line::new(temp_points).name("Temp (°C)"));

                if t_end > t0 {
                    let trip_line: PlotPoints = vec![
                        [t0, self.params.trip_temp_c],
                        [t_end, self.params.trip_temp_c],
                    ]
                    .into();
                    let floor_line: PlotPoints = vec![
                        [t0, self.params.temp_floor_c],
                        [t_end, self.params.temp_floor_c],
                    ]
                    .into();
                    plot_ui.line(Line::new(trip_line).name("Trip"));
                    plot_ui.line(Line::new(floor_line).name("Stall"));
                }
            });

            ui.heading("Power & rods");
            Plot::new("act_plot").height(180.0).show(ui, |plot_ui| {
                plot_ui.line(Line::new(power_points).name("Power (%)"));
                plot_ui.line(Line::new(rod_points).name("Rod position"));
            });

            ui.separator();
            let last = self.samples.last().unwrap();
            ui.label(format!(
                "t={:.1}s  temp={:.1}°C  power={:.1}%  rod={:.1}",
                last.t, last.temp, last.power, last.rod
            ));
        });
    }
}

fn main() -> eframe::Result<()> {
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "Reactor Arcade",
        native_options,
        Box::new(|_cc| Ok(Box::new(App::new()))),
    )
}
