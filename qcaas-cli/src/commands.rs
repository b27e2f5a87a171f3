//! Subcommand handlers.

use crate::{Commands, ConfigAction};
use qcaas_core::AppConfig;
use qcaas_core::config::WORKSPACE_CONFIG_FILE;
use qcaas_ml::{ComparisonPipeline, ComparisonResult, DatasetRegistry, MetricsReport};
use std::fmt::Write as _;
use std::path::Path;

pub async fn handle_command(
    command: Commands,
    mut config: AppConfig,
    workspace: &Path,
) -> anyhow::Result<()> {
    match command {
        Commands::Run {
            dataset,
            data_dir,
            qubits,
            shots,
            json,
        } => {
            if let Some(dir) = data_dir {
                config.pipeline.data_dir = dir;
            }
            if let Some(qubits) = qubits {
                config.pipeline.quantum.num_qubits = qubits;
            }
            if let Some(shots) = shots {
                config.pipeline.quantum.shots = shots;
            }
            handle_run(&dataset, config, json).await
        }
        Commands::Datasets => {
            print!("{}", render_datasets(&DatasetRegistry::builtin(), &config));
            Ok(())
        }
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            qcaas_core::run_gateway(&config).await?;
            Ok(())
        }
        Commands::Config { action } => handle_config(action, &config, workspace),
    }
}

async fn handle_run(dataset: &str, config: AppConfig, json: bool) -> anyhow::Result<()> {
    let pipeline = ComparisonPipeline::new(config.pipeline)?;
    let name = qcaas_ml::normalize_identifier(dataset);
    let result = tokio::task::spawn_blocking(move || pipeline.run(&name)).await??;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_summary(&result));
    }
    Ok(())
}

fn handle_config(action: ConfigAction, config: &AppConfig, workspace: &Path) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => {
            let toml_str = toml::to_string_pretty(config)?;
            println!("{}", toml_str);
            Ok(())
        }
        ConfigAction::Init => {
            let config_path = workspace.join(WORKSPACE_CONFIG_FILE);
            if config_path.exists() {
                println!(
                    "Configuration file already exists at: {}",
                    config_path.display()
                );
                return Ok(());
            }
            let toml_str = toml::to_string_pretty(&AppConfig::default())?;
            std::fs::write(&config_path, &toml_str)?;
            println!(
                "Created default configuration at: {}",
                config_path.display()
            );
            Ok(())
        }
    }
}

fn metric_row(out: &mut String, name: &str, svm: f64, vqc: f64) {
    let _ = writeln!(out, "  {name:<10} {svm:>8.4} {vqc:>8.4}");
}

/// Side-by-side metric table for terminal output.
pub(crate) fn render_summary(result: &ComparisonResult) -> String {
    let MetricsReport {
        accuracy: sa,
        precision: sp,
        recall: sr,
        f1_score: sf,
    } = result.svm_metrics;
    let MetricsReport {
        accuracy: va,
        precision: vp,
        recall: vr,
        f1_score: vf,
    } = result.vqc_metrics;

    let mut out = String::new();
    let _ = writeln!(out, "Dataset: {}", result.dataset_name);
    let _ = writeln!(out, "  {:<10} {:>8} {:>8}", "metric", "SVM", "VQC");
    metric_row(&mut out, "accuracy", sa, va);
    metric_row(&mut out, "precision", sp, vp);
    metric_row(&mut out, "recall", sr, vr);
    metric_row(&mut out, "f1_score", sf, vf);
    let _ = writeln!(out, "Winner: {}", result.winner);
    let _ = writeln!(out, "Execution time: {:.2}s", result.execution_time_seconds);
    out
}

/// Registered datasets and whether their CSV is present under the data directory.
pub(crate) fn render_datasets(registry: &DatasetRegistry, config: &AppConfig) -> String {
    let data_dir = &config.pipeline.data_dir;
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Registered datasets ({}), data dir {}:",
        registry.len(),
        data_dir.display()
    );
    for spec in registry.iter() {
        let present = if spec.source_path(data_dir).exists() {
            "ok"
        } else {
            "missing"
        };
        let _ = writeln!(
            out,
            "  {:<18} {:<24} target={:<12} [{present}]",
            spec.id, spec.file, spec.target
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use qcaas_ml::Winner;

    fn sample_result() -> ComparisonResult {
        ComparisonResult {
            svm_metrics: MetricsReport {
                accuracy: 0.9667,
                precision: 0.97,
                recall: 0.9667,
                f1_score: 0.9666,
            },
            vqc_metrics: MetricsReport {
                accuracy: 0.8,
                precision: 0.81,
                recall: 0.8,
                f1_score: 0.79,
            },
            winner: Winner::Svm,
            execution_time_seconds: 12.34,
            dataset_name: "iris".into(),
        }
    }

    #[test]
    fn test_render_summary() {
        let text = render_summary(&sample_result());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Dataset: iris");
        assert_eq!(lines[2], "  accuracy     0.9667   0.8000");
        assert_eq!(lines[6], "Winner: SVM");
        assert_eq!(lines[7], "Execution time: 12.34s");
    }

    #[test]
    fn test_render_datasets_marks_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("iris.csv"), "Id,Species\n").unwrap();
        let mut config = AppConfig::default();
        config.pipeline.data_dir = dir.path().to_path_buf();

        let text = render_datasets(&DatasetRegistry::builtin(), &config);
        let iris = text.lines().find(|l| l.contains("iris.csv")).unwrap();
        assert!(iris.ends_with("[ok]"));
        let heart = text.lines().find(|l| l.contains("heart.csv")).unwrap();
        assert!(heart.ends_with("[missing]"));
    }

    #[test]
    fn test_config_init_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::default();
        handle_config(ConfigAction::Init, &config, dir.path()).unwrap();

        let path = dir.path().join(WORKSPACE_CONFIG_FILE);
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("[server]"));

        std::fs::write(&path, "# edited\n").unwrap();
        handle_config(ConfigAction::Init, &config, dir.path()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# edited\n");
    }
}
