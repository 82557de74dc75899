/// Diagnostic tool to verify dataset → tree → layout → render pipeline
use std::path::PathBuf;

use anyhow::Context;
use tessera::dataset::load_dataset;
use tessera::layout::{compute_layout, LayoutConfig};
use tessera::render::colors::category10;
use tessera::render::display_list::DisplayList;
use tessera::render::{render_treemap, LegendStyle};
use tessera::tree::{self, aggregate};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tessera=debug".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .map(PathBuf::from)
        .context("usage: debug-layout <dataset.json> [width height]")?;
    let width: f64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(960.0);
    let height: f64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(400.0);

    println!("=== DIAGNOSTIC: Dataset → Tree → Layout Pipeline ===");
    println!("Loading: {}", path.display());

    // Load
    let raw = load_dataset(&path)?;
    println!("\n[1] Dataset '{}' loaded: {} leaves", raw.name, raw.leaf_count());

    // Build tree
    let tree = tree::build_tree(&raw)?;
    let root_node = tree.get(tree.root);
    println!(
        "\n[2] Tree built: {} nodes, {} categories, total weight {}",
        tree.len(),
        tree.categories.len(),
        root_node.weight
    );

    // Show top 10 children of root by weight
    println!("\n[3] Top 10 children of root:");
    let mut root_children: Vec<_> = tree.children(tree.root).collect();
    root_children.sort_by(|&a, &b| tree.get(b).weight.total_cmp(&tree.get(a).weight));
    for (i, child_id) in root_children.iter().take(10).enumerate() {
        let child = tree.get(*child_id);
        println!(
            "    [{}] '{}' - weight {} ({} children)",
            i,
            child.name,
            child.weight,
            tree.children(*child_id).count()
        );
    }

    // Compute layout
    let layout = compute_layout(&tree, width, height, &LayoutConfig::default())?;
    println!("\n[4] Layout computed: {} rectangles", layout.len());

    // Show top 10 largest rectangles
    println!("\n[5] Top 10 largest rectangles by area:");
    let mut sorted_rects = layout.rects.clone();
    sorted_rects.sort_by(|a, b| b.area().total_cmp(&a.area()));
    for (i, rect) in sorted_rects.iter().take(10).enumerate() {
        let node = tree.get(rect.node);
        println!(
            "    [{}] '{}' - rect: {:.1}x{:.1} ({:.0}px²) at ({:.1}, {:.1}) - weight {}",
            i,
            node.name,
            rect.width(),
            rect.height(),
            rect.area(),
            rect.x0,
            rect.y0,
            node.weight
        );
    }

    // Check for anomalies
    println!("\n[6] Checking for anomalies:");
    let viewport_area = width * height;
    let area_sum = layout.total_area();
    println!("    Total rect area: {:.0}px²", area_sum);
    println!("    Viewport area:   {:.0}px²", viewport_area);
    println!("    Coverage: {:.1}%", (area_sum / viewport_area) * 100.0);
    println!("    Leaf weight sum: {}", aggregate::leaf_total(&tree));

    let degenerate = layout.rects.iter().filter(|r| r.is_degenerate()).count();
    println!("    Zero-area rects: {}", degenerate);

    let mut overlaps = 0usize;
    for (i, a) in layout.rects.iter().enumerate() {
        for b in &layout.rects[i + 1..] {
            if a.intersection_area(b) > 1e-6 {
                overlaps += 1;
            }
        }
    }
    println!("    Overlapping pairs: {}", overlaps);

    // Render into memory and report the legend
    let mut surface = DisplayList::new();
    let stats = render_treemap(
        &mut surface,
        &tree,
        &layout,
        &category10(),
        &LegendStyle::default(),
    );
    println!("\n[7] Rendered {} tiles, {} legend entries:", stats.tiles, stats.legend_entries);
    for entry in &surface.legend {
        println!("    {} {}", entry.swatch.to_hex(), entry.label);
    }

    Ok(())
}
