//! pingln-infra CLI - declarative infrastructure synthesizer
//!
//! Usage: pingln-infra <COMMAND>
//!
//! Commands:
//!   synth    Render every stack template plus the assembly manifest
//!   diff     Compare the current composition against a rendered assembly
//!   outputs  List the outputs each stack declares

use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;

use pingln_infra::cli::{Cli, Commands};
use pingln_infra::composition::compose;
use pingln_infra::config::DeployConfig;
use pingln_infra::env::EnvVars;
use pingln_infra::presentation::{sink_for, Event, EventSink};
use pingln_infra::synth::{diff_against_dir, Assembly};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Synth { config, out } => cmd_synth(&config, &out, cli.json, cli.verbose),
        Commands::Diff { config, out } => cmd_diff(&config, &out, cli.json, cli.verbose),
        Commands::Outputs { config } => cmd_outputs(&config, cli.json, cli.verbose),
    }
}

/// Load the deployment config and compose the assembly, routeing
/// unknown-key warnings through the sink.
fn load_assembly(config_path: &Path, sink: &dyn EventSink) -> Result<Assembly> {
    let (config, warnings) = DeployConfig::load(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    for warning in warnings {
        sink.on_event(Event::ConfigWarning { message: warning.message });
    }

    let env_vars = EnvVars::from_process();
    let assembly = compose(&config, &env_vars)?;
    Ok(assembly)
}

fn cmd_synth(config_path: &Path, out: &Path, json: bool, verbose: u8) -> Result<()> {
    let sink = sink_for(json, verbose);

    sink.on_event(Event::SynthStarted {
        config: config_path.to_path_buf(),
        out_dir: out.to_path_buf(),
    });
    let assembly = load_assembly(config_path, sink.as_ref())?;

    let manifest = assembly
        .synth_to_dir(out)
        .with_context(|| format!("failed to write assembly to {}", out.display()))?;

    for stack in assembly.stacks() {
        let entry = &manifest.stacks[stack.name()];
        sink.on_event(Event::StackSynthesized {
            name: stack.name().to_string(),
            resource_count: stack.resource_count(),
            hash: entry.hash.to_string(),
        });
    }
    sink.on_event(Event::SynthCompleted {
        stack_count: assembly.stacks().len(),
        out_dir: out.to_path_buf(),
    });
    Ok(())
}

fn cmd_diff(config_path: &Path, out: &Path, json: bool, verbose: u8) -> Result<()> {
    let sink = sink_for(json, verbose);

    let assembly = load_assembly(config_path, sink.as_ref())?;
    let report = diff_against_dir(&assembly, out)
        .with_context(|| format!("failed to diff against {}", out.display()))?;

    for stack_diff in &report.stacks {
        sink.on_event(Event::StackDiffed {
            name: stack_diff.name.clone(),
            status: stack_diff.status,
            detail: stack_diff.detail.clone(),
        });
    }
    sink.on_event(Event::DiffCompleted {
        unchanged: report.is_unchanged(),
        changed_count: report.changed_count(),
    });

    if !report.is_unchanged() {
        std::process::exit(1);
    }
    Ok(())
}

fn cmd_outputs(config_path: &Path, json: bool, verbose: u8) -> Result<()> {
    let sink = sink_for(json, verbose);

    let assembly = load_assembly(config_path, sink.as_ref())?;
    for stack in assembly.stacks() {
        for (name, _output) in stack.outputs() {
            sink.on_event(Event::OutputListed {
                stack: stack.name().to_string(),
                name: name.clone(),
            });
        }
    }
    Ok(())
}
