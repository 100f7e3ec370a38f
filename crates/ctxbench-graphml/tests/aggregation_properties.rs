use ctxbench_graphml::{extract_symbols, FilePattern, SymbolAggregator};
use proptest::prelude::*;

fn document(symbols: &[String]) -> String {
    let mut text = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <graphml xmlns=\"http://graphml.graphdrawing.org/xmlns\">\n\
         <key id=\"v_symbol\" for=\"node\" attr.name=\"symbol\" attr.type=\"string\"/>\n\
         <graph id=\"G\" edgedefault=\"directed\">\n",
    );
    for (i, symbol) in symbols.iter().enumerate() {
        text.push_str(&format!(
            "<node id=\"n{i}\"><data key=\"v_symbol\">{symbol}</data></node>\n"
        ));
    }
    text.push_str("</graph>\n</graphml>\n");
    text
}

fn symbol_lists() -> impl Strategy<Value = Vec<Vec<String>>> {
    proptest::collection::vec(
        proptest::collection::vec("[A-Z][A-Z0-9]{0,5}", 0..20),
        1..6,
    )
}

proptest! {
    #[test]
    fn prop_every_node_symbol_is_extracted(symbols in proptest::collection::vec("[A-Z][A-Z0-9]{0,5}", 0..30)) {
        let extracted = extract_symbols(&document(&symbols)).unwrap();
        let values: Vec<&String> = extracted.values().collect();
        let expected: Vec<&String> = symbols.iter().collect();
        prop_assert_eq!(values, expected);
    }

    #[test]
    fn prop_counts_sum_to_symbol_occurrences(documents in symbol_lists()) {
        let mut aggregator = SymbolAggregator::new(FilePattern::any());
        for (i, symbols) in documents.iter().enumerate() {
            let name = format!("doc{i}.graphml");
            let folded = aggregator.ingest(&name, &document(symbols));
            prop_assert!(folded);
        }

        let total: usize = documents.iter().map(Vec::len).sum();
        let counted: u64 = aggregator.counts().values().sum();
        prop_assert_eq!(counted, total as u64);
        prop_assert_eq!(aggregator.documents_folded(), documents.len());

        for (symbol, count) in aggregator.counts() {
            let occurrences = documents.iter().flatten().filter(|s| *s == symbol).count();
            prop_assert_eq!(*count, occurrences as u64);
        }
    }

    #[test]
    fn prop_document_order_does_not_change_counts(documents in symbol_lists()) {
        let mut forward = SymbolAggregator::new(FilePattern::any());
        let mut backward = SymbolAggregator::new(FilePattern::any());
        for (i, symbols) in documents.iter().enumerate() {
            forward.ingest(&format!("doc{i}.graphml"), &document(symbols));
        }
        for (i, symbols) in documents.iter().enumerate().rev() {
            backward.ingest(&format!("doc{i}.graphml"), &document(symbols));
        }

        let mut a: Vec<(&String, &u64)> = forward.counts().iter().collect();
        let mut b: Vec<(&String, &u64)> = backward.counts().iter().collect();
        a.sort();
        b.sort();
        prop_assert_eq!(a, b);
    }
}
