use thema::{TermDocMatrix, TopicClustering};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Minimal end-to-end: counts -> TF-IDF -> distances -> dendrogram -> profiles.
    //
    // It intentionally stays small: it exists primarily to show the
    // integration path, not to be a realistic corpus.

    // Two obvious topics: farming and shipping, with "market" as shared
    // vocabulary that TF-IDF downweights.
    let rows: &[(&str, &[(&str, u32)])] = &[
        ("harvest-note", &[("wheat", 4), ("field", 2), ("market", 1)]),
        ("crop-update", &[("wheat", 3), ("field", 3), ("market", 1)]),
        ("soil-report", &[("field", 2), ("wheat", 1)]),
        ("port-log", &[("ship", 5), ("cargo", 2), ("market", 1)]),
        ("freight-memo", &[("ship", 2), ("cargo", 4), ("market", 1)]),
        ("dock-notice", &[("cargo", 3), ("ship", 1)]),
    ];

    let mut builder = TermDocMatrix::builder();
    for (doc, entries) in rows {
        for (term, count) in *entries {
            builder.add(doc, term, *count);
        }
    }
    let matrix = builder.build();

    let model = TopicClustering::new(2).with_top_terms(3).fit(&matrix)?;

    // Print a small summary: cluster -> size, top terms, members.
    let mut members: std::collections::BTreeMap<usize, Vec<&str>> =
        std::collections::BTreeMap::new();
    for (doc, label) in model.assignment().iter() {
        members.entry(label).or_default().push(doc);
    }

    println!("n_docs={} n_clusters={}", matrix.n_docs(), model.assignment().n_clusters());
    for summary in model.summaries() {
        let terms: Vec<String> = summary
            .terms
            .iter()
            .map(|t| format!("{} ({:+.3})", t.term, t.score))
            .collect();
        println!(
            "  cluster {} [{} docs]: {}",
            summary.label,
            summary.size,
            terms.join(", ")
        );
        println!("    members: {:?}", members[&summary.label]);
    }

    // The dendrogram is retained: re-cut without re-building.
    let three = model.dendrogram().cut_to_k(3)?;
    println!("re-cut at k=3 -> {} clusters", three.n_clusters());

    Ok(())
}
