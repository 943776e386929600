//! Text rendering of traversal results for an agent's personal output.

use super::entities::{GraphNode, NodeId};
use std::collections::HashSet;
use std::fmt::Write;

/// Render visited nodes with their edges restricted to the visited set.
///
/// Edges leading outside the visited set are only counted.
pub fn format_traversal(nodes: &[&GraphNode], result_metric: &str) -> String {
    let visited: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
    let metric = if result_metric.is_empty() {
        "result metric"
    } else {
        result_metric
    };

    let mut text = String::new();
    for node in nodes {
        let _ = write!(text, "Node ID: {}\n\n", node.id);
        let _ = write!(text, "\t{}\n", node.description);
        let _ = write!(
            text,
            "\tAssociated with a {} {}.\n\n",
            if node.effect_size > 0.0 { "higher" } else { "lower" },
            metric
        );
        text.push_str(&format_edges(node, &visited));
        text.push_str("\tStatistics:\n");
        let _ = writeln!(text, "\t\tEffect Size: {}", node.effect_size);
        let _ = write!(text, "\t\tP-Value: {}\n\n", node.p_value);
    }
    text
}

fn format_edges(node: &GraphNode, visited: &HashSet<NodeId>) -> String {
    let mut validates = String::new();
    let mut invalidates = String::new();
    let mut other_validates = 0;
    let mut other_invalidates = 0;

    for neighbor in &node.neighbors {
        if !visited.contains(&neighbor.id) {
            if neighbor.validates {
                other_validates += 1;
            } else {
                other_invalidates += 1;
            }
            continue;
        }

        let entry = format!(
            "\t\tNode ID: {}\n\t\tSimilarity: {}\n\n",
            neighbor.id, neighbor.similarity
        );
        if neighbor.validates {
            validates.push_str(&entry);
        } else {
            invalidates.push_str(&entry);
        }
    }

    format!(
        "\tValidates:\n\n{}\tInvalidates:\n\n{}",
        format_entries(validates, other_validates),
        format_entries(invalidates, other_invalidates)
    )
}

fn format_entries(mut entries: String, n_other: usize) -> String {
    match (entries.is_empty(), n_other) {
        (false, 0) => entries,
        (false, n) => {
            let _ = write!(entries, "\t\tAnd {} other nodes\n\n", n);
            entries
        }
        (true, 0) => "\t\tNothing\n\n".to_string(),
        (true, n) => format!("\t\t{} nodes\n\n", n),
    }
}
