//! Terminal output formatting.

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use wq_core::{GraphLink, NeighborhoodResult, SubgraphResult};
use wq_graph::sync::validate::{CheckKind, ValidationReport};
use wq_graph::{GraphCounts, NodeLabel, RelType};

const ROOTS_WIDTH: usize = 40;

/// Print the post-rebuild validation table. Mismatches are shown in red.
pub fn print_validation(report: &ValidationReport) {
    println!("{}", "Validation".bold());
    println!(
        "  {} {} {:>10} {:>10}",
        pad_right("Name", 14),
        pad_right("Kind", 13),
        "Snapshot",
        "Graph"
    );
    println!("  {}", "─".repeat(50));

    for check in &report.checks {
        let kind = match check.kind {
            CheckKind::Node => "node",
            CheckKind::Relationship => "relationship",
        };
        let line = format!(
            "  {} {} {:>10} {:>10}",
            pad_right(check.name, 14),
            pad_right(kind, 13),
            check.expected,
            check.actual
        );
        if check.is_match() {
            println!("{}", line);
        } else {
            println!("{}", line.red());
        }
    }

    let mismatches = report.mismatches().count();
    println!();
    if mismatches == 0 {
        println!("{}", "Graph matches snapshot.".green());
    } else {
        println!(
            "{}",
            format!("{} count(s) differ from the snapshot.", mismatches).yellow()
        );
    }
}

/// Print node and relationship counts.
pub fn print_counts(counts: &GraphCounts) {
    for label in NodeLabel::ALL {
        println!("  {} {:>10}", pad_right(label.as_str(), 14), counts.label(label));
    }
    for rel in RelType::ALL {
        println!("  {} {:>10}", pad_right(rel.as_str(), 14), counts.rel(rel));
    }
    println!(
        "  {}",
        format!(
            "{} nodes, {} relationships",
            counts.nodes(),
            counts.relationships()
        )
        .dimmed()
    );
}

/// Print a verse neighborhood.
pub fn print_neighborhood(result: &NeighborhoodResult) {
    println!(
        "{} {} (min roots {}, limit {})",
        "Neighbors of".bold(),
        result.center.id.cyan(),
        result.meta.min_shared_roots,
        result.meta.limit
    );
    println!("{}", "─".repeat(60));

    if result.links.is_empty() {
        println!("{}", "No verses share enough roots.".dimmed());
        return;
    }
    print_links(&result.links);
    println!("\n{} link(s).", result.meta.total_links.to_string().bold());
}

/// Print a root subgraph.
pub fn print_subgraph(result: &SubgraphResult) {
    println!(
        "{} {} {} ({} occurrences, {} verses)",
        "Root".bold(),
        result.root.key.cyan(),
        result.root.arabic,
        result.root.occurrences_count,
        result.root.total_ayahs
    );
    println!(
        "{}",
        format!(
            "mode {}, max nodes {}, min roots {}, limit {}",
            result.meta.mode,
            result.meta.max_nodes,
            result.meta.min_shared_roots,
            result.meta.limit
        )
        .dimmed()
    );
    println!("{}", "─".repeat(60));

    if result.nodes.is_empty() {
        println!("{}", "No verses selected.".dimmed());
        return;
    }

    let ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
    println!("{} {}", "Verses:".bold(), ids.join(", "));
    println!();

    if result.links.is_empty() {
        println!("{}", "No links between selected verses.".dimmed());
    } else {
        print_links(&result.links);
    }
    println!(
        "\n{} verse(s), {} link(s).",
        result.meta.total_nodes.to_string().bold(),
        result.meta.total_links.to_string().bold()
    );
}

fn print_links(links: &[GraphLink]) {
    for link in links {
        let roots = truncate_visual(&link.root_keys.join(" "), ROOTS_WIDTH);
        println!(
            "  {} {} {}  {}  {}",
            pad_right(&link.source, 8),
            "→".dimmed(),
            pad_right(&link.target, 8),
            format!("w={}", link.weight).yellow(),
            roots.dimmed()
        );
    }
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}
