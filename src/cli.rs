//! CLI argument parsing and command execution
//!
//! Arguments are parsed from any string iterator so the parser can be tested
//! without a process. `execute` returns the process exit code.

use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result};
use crate::features::{FeatureVector, StructureRep};
use crate::report::SweepSummary;
use crate::scenario::{ScenarioConfig, SceneLayout, SweepSpec, parse_facts, render_facts};
use crate::settings::{RunMode, RunSettings};
use crate::sim::{domino_tips, run_scenario};

/// Exit code for a successful outcome
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for a run that finished without success
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for bad input or a simulation fault
pub const EXIT_ERROR: i32 = 2;

#[derive(Debug, Clone, PartialEq)]
pub struct Args {
    pub command: Command,
}

/// Where a scene comes from
#[derive(Debug, Clone, PartialEq)]
pub enum ScenarioSource {
    /// Default parameters
    Default,
    /// Named task preset
    Task(String),
    /// Parameter vector (missing trailing values take defaults)
    Params(Vec<f32>),
    /// Fact-list file with the hole size it is staged with
    Facts { path: PathBuf, hole_size: f32 },
}

impl ScenarioSource {
    pub fn layout(&self) -> Result<SceneLayout> {
        match self {
            ScenarioSource::Default => ScenarioConfig::default().layout(),
            ScenarioSource::Task(name) => ScenarioConfig::task(name)
                .ok_or_else(|| Error::config(format!("unknown task '{name}'")))?
                .layout(),
            ScenarioSource::Params(params) => ScenarioConfig::from_params(params)?.layout(),
            ScenarioSource::Facts { path, hole_size } => {
                let text = fs::read_to_string(path)?;
                parse_facts(&text, *hole_size)
            }
        }
    }
}

/// Options shared by commands that step a world
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RunOptions {
    pub mode: Option<RunMode>,
    pub settings_path: Option<PathBuf>,
    pub trace: bool,
}

impl RunOptions {
    /// Settings file (if any), then the mode preset, then the trace flag
    pub fn settings(&self, default_mode: RunMode) -> Result<RunSettings> {
        let mut settings = match &self.settings_path {
            Some(path) => RunSettings::load(path)?,
            None => RunSettings::from_preset(default_mode),
        };
        if let Some(mode) = self.mode {
            settings.apply_preset(mode);
        }
        settings.record_trace |= self.trace;
        Ok(settings)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Run one scenario and print its report
    Run {
        source: ScenarioSource,
        options: RunOptions,
    },
    /// Generate the scenario catalogue, optionally running every scenario
    Sweep {
        out_dir: Option<PathBuf>,
        run: bool,
        summary_path: Option<PathBuf>,
        options: RunOptions,
    },
    /// Print a scenario as a fact list, appending `success.` if `run` and it succeeds
    Facts {
        source: ScenarioSource,
        run: bool,
        options: RunOptions,
    },
    /// Print the abstract features of a scenario
    Features { source: ScenarioSource },
    /// Single-domino tip probe
    Probe {
        width: f32,
        height: f32,
        options: RunOptions,
    },
    Help,
    Version,
}

impl Args {
    pub fn parse_from<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let args: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse_from_vec(&args)
    }

    pub fn parse() -> Result<Self> {
        Self::parse_from(std::env::args())
    }

    fn parse_from_vec(args: &[String]) -> Result<Self> {
        let Some(name) = args.get(1) else {
            return Ok(Self {
                command: Command::Help,
            });
        };
        let rest = &args[2..];

        let command = match name.as_str() {
            "run" => {
                let mut flags = Flags::parse(rest)?;
                Command::Run {
                    source: flags.source()?,
                    options: flags.options()?,
                }
            }
            "sweep" => {
                let mut flags = Flags::parse(rest)?;
                Command::Sweep {
                    out_dir: flags.take("--out").map(PathBuf::from),
                    run: flags.switch("--run"),
                    summary_path: flags.take("--summary").map(PathBuf::from),
                    options: flags.options()?,
                }
            }
            "facts" => {
                let mut flags = Flags::parse(rest)?;
                Command::Facts {
                    source: flags.source()?,
                    run: flags.switch("--run"),
                    options: flags.options()?,
                }
            }
            "features" => {
                let mut flags = Flags::parse(rest)?;
                Command::Features {
                    source: flags.source()?,
                }
            }
            "probe" => {
                let mut flags = Flags::parse(rest)?;
                let (width, height) = match flags.positional.as_slice() {
                    [w, h] => (number("WIDTH", w)?, number("HEIGHT", h)?),
                    _ => return Err(Error::config("'probe' requires WIDTH and HEIGHT")),
                };
                Command::Probe {
                    width,
                    height,
                    options: flags.options()?,
                }
            }
            "-h" | "--help" | "help" => Command::Help,
            "-V" | "--version" | "version" => Command::Version,
            unknown => return Err(Error::config(format!("unknown command '{unknown}'"))),
        };
        Ok(Self { command })
    }
}

/// `--name value` pairs, bare switches and positionals, in order seen
#[derive(Debug, Default)]
struct Flags {
    values: Vec<(String, String)>,
    switches: Vec<String>,
    positional: Vec<String>,
}

const SWITCHES: &[&str] = &["--run", "--trace"];

impl Flags {
    fn parse(args: &[String]) -> Result<Self> {
        let mut flags = Self::default();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if SWITCHES.contains(&arg.as_str()) {
                flags.switches.push(arg.clone());
            } else if arg.starts_with("--") {
                let value = iter
                    .next()
                    .ok_or_else(|| Error::config(format!("{arg} requires a value")))?;
                flags.values.push((arg.clone(), value.clone()));
            } else {
                flags.positional.push(arg.clone());
            }
        }
        Ok(flags)
    }

    fn take(&mut self, name: &str) -> Option<String> {
        let idx = self.values.iter().position(|(n, _)| n == name)?;
        Some(self.values.remove(idx).1)
    }

    fn switch(&self, name: &str) -> bool {
        self.switches.iter().any(|s| s == name)
    }

    fn source(&mut self) -> Result<ScenarioSource> {
        let task = self.take("--task");
        let params = self.take("--params");
        let facts = self.take("--facts");
        let hole = self.take("--hole");

        let source = match (task, params, facts) {
            (None, None, None) => ScenarioSource::Default,
            (Some(task), None, None) => ScenarioSource::Task(task),
            (None, Some(params), None) => ScenarioSource::Params(
                params
                    .split(',')
                    .map(|p| number("--params", p.trim()))
                    .collect::<Result<_>>()?,
            ),
            (None, None, Some(path)) => {
                let hole_size = match &hole {
                    Some(h) => number("--hole", h)?,
                    None => 0.0,
                };
                return Ok(ScenarioSource::Facts {
                    path: PathBuf::from(path),
                    hole_size,
                });
            }
            _ => {
                return Err(Error::config(
                    "choose one of --task, --params or --facts",
                ));
            }
        };
        if hole.is_some() {
            return Err(Error::config("--hole only applies to --facts"));
        }
        Ok(source)
    }

    fn options(&mut self) -> Result<RunOptions> {
        let mode = match self.take("--mode") {
            Some(name) => Some(
                RunMode::from_str(&name)
                    .ok_or_else(|| Error::config(format!("unknown mode '{name}'")))?,
            ),
            None => None,
        };
        Ok(RunOptions {
            mode,
            settings_path: self.take("--settings").map(PathBuf::from),
            trace: self.switch("--trace"),
        })
    }
}

fn number(name: &str, value: &str) -> Result<f32> {
    value
        .parse()
        .map_err(|_| Error::config(format!("{name}: '{value}' is not a number")))
}

pub const USAGE: &str = "\
domino-beam: domino chain, ball and balance beam scenarios

USAGE:
    domino-beam <COMMAND> [OPTIONS]

COMMANDS:
    run        Run one scenario and print its report as JSON
    sweep      Generate the scenario catalogue (--out DIR, --run, --summary PATH)
    facts      Print a scenario as a fact list (--run appends 'success.')
    features   Print the abstract features of a scenario
    probe      Check whether a WIDTH x HEIGHT domino tips over
    help       Show this message
    version    Show the version

SCENARIO:
    --task NAME          task_1, task_2 or task_3
    --params a,b,..      spacing,width,height,count,gap,hole
    --facts PATH         fact-list file
    --hole SIZE          hole size for --facts (default 0)

RUN OPTIONS:
    --mode MODE          interactive, batch or probe
    --settings PATH      JSON run settings
    --trace              record a per-step trace

Exit code: 0 on success (or tip for probe), 1 otherwise, 2 on errors.
";

/// Run a parsed command and return the exit code
pub fn execute(command: &Command) -> Result<i32> {
    match command {
        Command::Run { source, options } => {
            let layout = source.layout()?;
            let settings = options.settings(RunMode::Interactive)?;
            let report = run_scenario(&layout, &settings)?;
            println!("{}", report.to_json()?);
            Ok(exit_code(report.is_success()))
        }
        Command::Sweep {
            out_dir,
            run,
            summary_path,
            options,
        } => {
            let scenarios = SweepSpec::default().scenarios();
            if let Some(dir) = out_dir {
                fs::create_dir_all(dir)?;
                for scenario in &scenarios {
                    fs::write(dir.join(format!("{}.lp", scenario.name)), scenario.facts())?;
                }
                log::info!("Wrote {} scenarios to {}", scenarios.len(), dir.display());
            }
            if !*run {
                for scenario in &scenarios {
                    println!(
                        "{} ratio={} count={} skip={}",
                        scenario.name, scenario.ratio, scenario.count, scenario.skip
                    );
                }
                return Ok(EXIT_SUCCESS);
            }

            let settings = options.settings(RunMode::Batch)?;
            let mut summary = SweepSummary::new();
            for scenario in &scenarios {
                let report = run_scenario(&scenario.layout, &settings)?;
                println!("{} {}", scenario.name, report.outcome.as_str());
                summary.add(scenario.name.as_str(), &report);
            }
            println!("{}/{} succeeded", summary.success_count(), summary.len());
            if let Some(path) = summary_path {
                summary.save(path)?;
            }
            Ok(EXIT_SUCCESS)
        }
        Command::Facts {
            source,
            run,
            options,
        } => {
            let layout = source.layout()?;
            print!("{}", render_facts(&layout));
            if !*run {
                return Ok(EXIT_SUCCESS);
            }
            let settings = options.settings(RunMode::Batch)?;
            let report = run_scenario(&layout, &settings)?;
            if report.is_success() {
                println!("success.");
            }
            Ok(exit_code(report.is_success()))
        }
        Command::Features { source } => {
            let layout = source.layout()?;
            let features = FeatureVector::compute(&StructureRep::from_layout(&layout));
            println!("{}", serde_json::to_string_pretty(&features)?);
            Ok(EXIT_SUCCESS)
        }
        Command::Probe {
            width,
            height,
            options,
        } => {
            let settings = options.settings(RunMode::Probe)?;
            let tipped = domino_tips(*width, *height, &settings)?;
            println!("{}", if tipped { "tips" } else { "stands" });
            Ok(exit_code(tipped))
        }
        Command::Help => {
            print!("{USAGE}");
            Ok(EXIT_SUCCESS)
        }
        Command::Version => {
            println!("domino-beam {}", env!("CARGO_PKG_VERSION"));
            Ok(EXIT_SUCCESS)
        }
    }
}

fn exit_code(success: bool) -> i32 {
    if success { EXIT_SUCCESS } else { EXIT_FAILURE }
}
