//! Plan rendering.
//!
//! Resolves the plan's indices to names and formats it for humans
//! (one comma-joined line per reboot group) or machines (JSON).

use serde::Serialize;

use gridroll_cluster::ClusterData;
use gridroll_planner::{PlanStats, RebootPlan};

/// Rendering switches; these never influence the plan itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    pub print_moves: bool,
    pub no_headers: bool,
    pub verbose: u8,
}

/// A plan with every index resolved to its entity name.
#[derive(Debug, Clone, Serialize)]
pub struct NamedPlan {
    pub groups: Vec<NamedGroup>,
    pub stats: PlanStats,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedGroup {
    pub nodes: Vec<String>,
    pub moves: Vec<NamedMove>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NamedMove {
    pub instance: String,
    pub node: String,
}

/// Resolve node and instance indices to names.
pub fn resolve_names(plan: &RebootPlan, data: &ClusterData) -> anyhow::Result<NamedPlan> {
    let mut groups = Vec::new();
    for group in &plan.groups {
        let mut nodes = Vec::new();
        for &ndx in &group.nodes {
            nodes.push(data.state.nodes.find(ndx)?.name.clone());
        }
        let mut moves = Vec::new();
        for &(idx, ndx) in &group.moves {
            moves.push(NamedMove {
                instance: data.state.instances.find(idx)?.name.clone(),
                node: data.state.nodes.find(ndx)?.name.clone(),
            });
        }
        groups.push(NamedGroup { nodes, moves });
    }
    Ok(NamedPlan { groups, stats: plan.stats.clone() })
}

/// Format the plan as text.
pub fn format_text(named: &NamedPlan, opts: &RenderOptions) -> String {
    let mut out = String::new();

    if opts.verbose >= 2 {
        out.push_str("Coloring statistics:\n");
        for s in &named.stats.color_counts {
            out.push_str(&format!("  {}: {} color(s)\n", s.algorithm, s.colors));
        }
        out.push_str(&format!("Selected: {}\n", named.stats.algorithm));
    }

    if !opts.no_headers {
        out.push_str("Node reboot groups\n");
    }

    for group in &named.groups {
        out.push_str(&group.nodes.join(","));
        out.push('\n');
        if opts.print_moves {
            for mv in &group.moves {
                out.push_str(&format!("  migrate {} to {}\n", mv.instance, mv.node));
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridroll_graph::ColoringStats;

    fn named_plan() -> NamedPlan {
        NamedPlan {
            groups: vec![
                NamedGroup {
                    nodes: vec!["beta".to_string(), "gamma".to_string()],
                    moves: vec![NamedMove {
                        instance: "web".to_string(),
                        node: "alpha".to_string(),
                    }],
                },
                NamedGroup { nodes: vec!["alpha".to_string()], moves: Vec::new() },
            ],
            stats: PlanStats {
                algorithm: "LF",
                color_counts: vec![
                    ColoringStats { algorithm: "LF", colors: 2 },
                    ColoringStats { algorithm: "DSATUR", colors: 2 },
                    ColoringStats { algorithm: "RLF", colors: 2 },
                ],
                vertex_count: 3,
                edge_count: 2,
            },
        }
    }

    #[test]
    fn default_output_is_header_and_group_lines() {
        let out = format_text(&named_plan(), &RenderOptions::default());
        assert_eq!(out, "Node reboot groups\nbeta,gamma\nalpha\n");
    }

    #[test]
    fn no_headers_suppresses_the_heading() {
        let opts = RenderOptions { no_headers: true, ..Default::default() };
        let out = format_text(&named_plan(), &opts);
        assert_eq!(out, "beta,gamma\nalpha\n");
    }

    #[test]
    fn print_moves_lists_evacuations_under_their_group() {
        let opts = RenderOptions { print_moves: true, ..Default::default() };
        let out = format_text(&named_plan(), &opts);
        assert_eq!(
            out,
            "Node reboot groups\nbeta,gamma\n  migrate web to alpha\nalpha\n"
        );
    }

    #[test]
    fn verbose_output_includes_coloring_statistics() {
        let opts = RenderOptions { verbose: 2, ..Default::default() };
        let out = format_text(&named_plan(), &opts);
        assert!(out.starts_with("Coloring statistics:\n  LF: 2 color(s)\n"));
        assert!(out.contains("Selected: LF\n"));
    }

    #[test]
    fn json_serialization_resolves_names() {
        let json = serde_json::to_value(named_plan()).unwrap();
        assert_eq!(json["groups"][0]["nodes"][0], "beta");
        assert_eq!(json["groups"][0]["moves"][0]["instance"], "web");
        assert_eq!(json["stats"]["algorithm"], "LF");
    }
}
