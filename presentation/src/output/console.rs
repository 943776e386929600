//! Console formatting for session runs

use agora_application::{
    EngineConfig, Notification, PlanOutcome, SessionReport, StopReason, TurnReport,
};
use colored::Colorize;
use std::path::Path;

/// Formats session output for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Banner printed before the first turn
    pub fn header(config: &EngineConfig, state_path: &Path) -> String {
        let mut output = String::new();

        output.push_str(&Self::banner("Agora Session"));
        output.push('\n');

        if !config.objective.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                "Objective:".cyan().bold(),
                config.objective
            ));
        }
        output.push_str(&format!("{}\n", "Agents:".cyan().bold()));
        for profile in config.roster.profiles() {
            let models = if profile.models.is_empty() {
                "(gateway default)".dimmed().to_string()
            } else {
                profile.models.join(", ")
            };
            output.push_str(&format!("  * {} {}\n", profile.id.to_string().bold(), models));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Quorum:".cyan().bold(),
            config.quorum_rule
        ));
        output.push_str(&format!(
            "{} {}\n",
            "State:".cyan().bold(),
            state_path.display()
        ));
        output.push_str(&"-".repeat(60));
        output.push('\n');

        output
    }

    /// One line per completed turn
    pub fn turn_line(report: &TurnReport) -> String {
        let mut parts = vec![format!(
            "{} {}",
            format!(
                "[round {} turn {}]",
                report.cursor_before.n_rounds, report.cursor_before.turn
            )
            .dimmed(),
            report.agent.to_string().bold()
        )];

        for notification in &report.notifications {
            parts.push(match notification {
                Notification::GraphRebuilt => "graph rebuilt".blue().to_string(),
                Notification::JobFinished => "jobs finished".blue().to_string(),
            });
        }

        if report.reasoning_failed {
            parts.push("reasoning failed".red().to_string());
        } else if let Some(model) = &report.model {
            parts.push(model.dimmed().to_string());
        }

        if !report.commands.is_empty() {
            let commands: Vec<String> = report
                .commands
                .iter()
                .map(|c| {
                    if c.accepted {
                        format!("{} {}", "v".green(), c.name)
                    } else {
                        format!("{} {}", "x".red(), c.name)
                    }
                })
                .collect();
            parts.push(commands.join(" "));
        }

        match report.plan {
            PlanOutcome::Updated => parts.push("plan updated".cyan().to_string()),
            PlanOutcome::Failed => parts.push("plan failed".red().to_string()),
            PlanOutcome::Disabled | PlanOutcome::Waiting | PlanOutcome::Incomplete => {}
        }
        if report.evicted > 0 {
            parts.push(format!("summarized {}", report.evicted).cyan().to_string());
        }

        if let Some(tally) = &report.tally {
            let verdict = format!("vote {}/{}", tally.votes, tally.n_agents);
            parts.push(if tally.passed {
                format!("{} passed", verdict).green().bold().to_string()
            } else {
                format!("{} failed", verdict).yellow().bold().to_string()
            });
        }

        parts.join("  ")
    }

    /// Closing summary
    pub fn summary(report: &SessionReport) -> String {
        let mut output = String::new();
        output.push_str(&"-".repeat(60));
        output.push('\n');

        let reason = match report.stop_reason {
            StopReason::Cancelled => report.stop_reason.to_string().yellow(),
            StopReason::RoundLimit | StopReason::TurnBudget => {
                report.stop_reason.to_string().green()
            }
        };
        output.push_str(&format!("{} {}\n", "Stopped:".cyan().bold(), reason));
        output.push_str(&format!(
            "{} {} ({})\n",
            "Turns run:".cyan().bold(),
            report.turns_run,
            if report.resumed {
                "resumed session"
            } else {
                "new session"
            }
        ));
        output.push_str(&format!(
            "{} round {}, next turn {}\n",
            "Position:".cyan().bold(),
            report.cursor.n_rounds,
            report.cursor.turn
        ));
        if report.job_running {
            output.push_str(&format!(
                "{}\n",
                "Experiments are still running.".yellow()
            ));
        }

        output
    }

    fn banner(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agora_application::CommandOutcome;
    use agora_domain::{AgentId, AgentProfile, AgentRoster, Tally, TurnCursor};

    fn plain() {
        colored::control::set_override(false);
    }

    fn report() -> TurnReport {
        TurnReport {
            agent: AgentId::new("Agent 1"),
            cursor_before: TurnCursor { turn: 1, n_rounds: 2 },
            cursor_after: TurnCursor { turn: 0, n_rounds: 3 },
            notifications: vec![Notification::GraphRebuilt],
            model: Some("deepseek/deepseek-v3.2".to_string()),
            reasoning_failed: false,
            plan: PlanOutcome::Updated,
            evicted: 4,
            commands: vec![
                CommandOutcome {
                    name: "message".to_string(),
                    accepted: true,
                },
                CommandOutcome {
                    name: "vote".to_string(),
                    accepted: false,
                },
            ],
            tally: Some(Tally {
                votes: 2,
                n_agents: 3,
                passed: true,
            }),
        }
    }

    #[test]
    fn test_turn_line() {
        plain();
        let line = ConsoleFormatter::turn_line(&report());
        assert_eq!(
            line,
            "[round 2 turn 1] Agent 1  graph rebuilt  deepseek/deepseek-v3.2  v message x vote  plan updated  summarized 4  vote 2/3 passed"
        );
    }

    #[test]
    fn test_turn_line_reasoning_failed() {
        plain();
        let mut report = report();
        report.reasoning_failed = true;
        report.model = None;
        report.notifications.clear();
        report.commands.clear();
        report.plan = PlanOutcome::Waiting;
        report.evicted = 0;
        report.tally = None;
        assert_eq!(
            ConsoleFormatter::turn_line(&report),
            "[round 2 turn 1] Agent 1  reasoning failed"
        );
    }

    #[test]
    fn test_header_lists_agents() {
        plain();
        let roster = AgentRoster::new(vec![
            AgentProfile::new("Agent 1").with_models(vec!["m1".to_string()]),
            AgentProfile::new("Agent 2"),
        ])
        .unwrap();
        let config = EngineConfig::new(roster).with_objective("Raise accuracy");
        let header = ConsoleFormatter::header(&config, Path::new("data/state.json"));

        assert!(header.contains("Objective: Raise accuracy"));
        assert!(header.contains("* Agent 1 m1"));
        assert!(header.contains("* Agent 2 (gateway default)"));
        assert!(header.contains("State: data/state.json"));
    }

    #[test]
    fn test_summary() {
        plain();
        let summary = ConsoleFormatter::summary(&SessionReport {
            turns_run: 6,
            cursor: TurnCursor { turn: 0, n_rounds: 2 },
            stop_reason: StopReason::RoundLimit,
            resumed: true,
            job_running: true,
        });
        assert!(summary.contains("Turns run: 6 (resumed session)"));
        assert!(summary.contains("Position: round 2, next turn 0"));
        assert!(summary.contains("Experiments are still running."));
    }
}
