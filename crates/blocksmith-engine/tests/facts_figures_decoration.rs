use blocksmith_config::BlockConfig;
use blocksmith_dom::{Document, NodeId, parse_block};
use blocksmith_engine::blocks::facts_figures;
use blocksmith_engine::{
    BlockRuntime, DataLayer, Decoration, EventBinding, NullSink, VisibilityAction,
};
use rstest::rstest;
use serde_json::json;

fn decorate(html: &str) -> (Document, NodeId, Decoration) {
    let (mut doc, block) = parse_block(html).unwrap();
    let decoration = facts_figures::decorate(&mut doc, block, &BlockConfig::facts_figures_cards());
    (doc, block, decoration)
}

fn two_row_fixture() -> String {
    r#"<div class="facts-figures-cards block">
        <div>
            <div><h2>42%</h2><p>of statistics are made up</p></div>
            <div><h2>10x</h2><p>faster authoring</p></div>
        </div>
        <div>
            <div><h2>7</h2><p>content <a href="/teams">teams</a> onboarded</p></div>
        </div>
    </div>"#
        .to_string()
}

#[test]
fn rows_and_cells_carry_positional_indexes() {
    let (doc, block, _) = decorate(&two_row_fixture());

    let rows = doc.all_with_class(block, "facts-figures-cards-row");
    assert_eq!(rows.len(), 2);
    for (index, row) in rows.iter().enumerate() {
        assert_eq!(doc.attr(*row, "data-row-index"), Some(index.to_string().as_str()));
        let cells = doc.all_with_class(*row, "facts-figures-cards-cell");
        for (cell_index, cell) in cells.iter().enumerate() {
            assert_eq!(
                doc.attr(*cell, "data-cell-index"),
                Some(cell_index.to_string().as_str())
            );
        }
    }
}

#[test]
fn missing_tokens_yield_default_variant_and_size() {
    let (doc, block, _) = decorate(&two_row_fixture());

    let cell = doc.all_with_class(block, "facts-figures-cards-cell")[0];
    assert!(doc.has_class(cell, "variant-h4-default"));
    assert!(doc.has_class(cell, "size-col-4"));

    // Authored h2 titles are coerced to the default variant's h4.
    let title = doc.first_with_class(cell, "facts-figures-cards-title").unwrap();
    assert_eq!(doc.tag(title), Some("h4"));
    assert_eq!(doc.text_content(title), "42%");
}

#[test]
fn h3_highlighted_variant_coerces_and_h5_variants_tag_titles() {
    let (doc, block, _) = decorate(
        r#"<div class="facts-figures-cards block variant-h3-highlighted col-6">
            <div><div><h5>90%</h5><p>renewal rate</p></div></div>
        </div>"#,
    );

    let cell = doc.all_with_class(block, "facts-figures-cards-cell")[0];
    assert!(doc.has_class(cell, "variant-h3-highlighted"));
    assert!(doc.has_class(cell, "size-col-6"));
    let title = doc.first_with_class(block, "facts-figures-cards-title").unwrap();
    assert_eq!(doc.tag(title), Some("h3"));

    let (doc, block, _) = decorate(
        r#"<div class="facts-figures-cards block variant-h5-short">
            <div><div><h2>99.9%</h2><p>uptime</p></div></div>
        </div>"#,
    );
    let title = doc.first_with_class(block, "facts-figures-cards-title").unwrap();
    assert_eq!(doc.tag(title), Some("h5"));
    assert!(doc.has_class(title, "h5-short"));
}

#[test]
fn correct_tag_is_not_replaced() {
    // An authored h4 under the default variant keeps its extra attributes,
    // which a clone-and-replace would have dropped.
    let (doc, block, _) = decorate(
        r#"<div class="facts-figures-cards block">
            <div><div><h4 id="keep" data-origin="authored">42%</h4><p>kept</p></div></div>
        </div>"#,
    );
    let title = doc.first_with_class(block, "facts-figures-cards-title").unwrap();
    assert_eq!(doc.tag(title), Some("h4"));
    assert_eq!(doc.attr(title, "id"), Some("keep"));
    assert_eq!(doc.attr(title, "data-origin"), Some("authored"));
}

#[test]
fn wrong_tag_replacement_keeps_classes_and_content_but_drops_attrs() {
    let (doc, block, _) = decorate(
        r#"<div class="facts-figures-cards block">
            <div><div><h2 data-origin="authored">42%</h2><p>dropped</p></div></div>
        </div>"#,
    );
    let title = doc.first_with_class(block, "facts-figures-cards-title").unwrap();
    assert_eq!(doc.tag(title), Some("h4"));
    assert_eq!(doc.text_content(title), "42%");
    assert_eq!(doc.attr(title, "data-origin"), None);
}

#[rstest]
#[case("variant-h4-default", 45)]
#[case("variant-h5-short", 80)]
#[case("variant-h5-long", 200)]
fn text_at_ceiling_passes_and_one_over_flags(#[case] token: &str, #[case] ceiling: usize) {
    for (length, expect_overflow) in [(ceiling, false), (ceiling + 1, true)] {
        let text = "x".repeat(length);
        let (doc, block, _) = decorate(&format!(
            r#"<div class="facts-figures-cards block {token}">
                <div><div><h4>1</h4><p>{text}</p></div></div>
            </div>"#
        ));
        let paragraph = doc.first_with_class(block, "facts-figures-cards-text").unwrap();
        assert_eq!(
            doc.attr(paragraph, "data-overflow"),
            if expect_overflow { Some("true") } else { None },
            "length {length} for {token}"
        );
    }
}

#[test]
fn h3_highlighted_text_is_never_flagged() {
    let text = "x".repeat(500);
    let (doc, block, _) = decorate(&format!(
        r#"<div class="facts-figures-cards block variant-h3-highlighted">
            <div><div><h3>1</h3><p>{text}</p></div></div>
        </div>"#
    ));
    let paragraph = doc.first_with_class(block, "facts-figures-cards-text").unwrap();
    assert_eq!(doc.attr(paragraph, "data-overflow"), None);
}

#[test]
fn accessibility_wiring() {
    let (doc, block, _) = decorate(&two_row_fixture());

    assert_eq!(doc.attr(block, "role"), Some("region"));
    assert_eq!(doc.attr(block, "aria-label"), Some("Facts and Figures"));

    let titles = doc.all_with_class(block, "facts-figures-cards-title");
    assert_eq!(titles.len(), 3);
    for (index, title) in titles.iter().enumerate() {
        let expected_id = format!("facts-figure-{}", index + 1);
        assert_eq!(doc.attr(*title, "id"), Some(expected_id.as_str()));
    }

    let texts = doc.all_with_class(block, "facts-figures-cards-text");
    assert_eq!(doc.attr(texts[0], "aria-describedby"), Some("facts-figure-1"));
    assert_eq!(doc.attr(texts[2], "aria-describedby"), Some("facts-figure-3"));

    // Only the cell containing a link becomes focusable.
    let cells = doc.all_with_class(block, "facts-figures-cards-cell");
    assert_eq!(doc.attr(cells[0], "tabindex"), None);
    assert_eq!(doc.attr(cells[2], "tabindex"), Some("0"));
}

#[test]
fn authored_title_ids_are_preserved() {
    let (doc, block, _) = decorate(
        r#"<div class="facts-figures-cards block">
            <div><div><h4 id="custom-stat">42%</h4><p>kept</p></div></div>
        </div>"#,
    );
    let title = doc.first_with_class(block, "facts-figures-cards-title").unwrap();
    assert_eq!(doc.attr(title, "id"), Some("custom-stat"));
    let text = doc.first_with_class(block, "facts-figures-cards-text").unwrap();
    assert_eq!(doc.attr(text, "aria-describedby"), Some("custom-stat"));
}

#[test]
fn cells_start_hidden_with_staggered_reveal_triggers() {
    let (doc, block, decoration) = decorate(&two_row_fixture());

    let cells = doc.all_with_class(block, "facts-figures-cards-cell");
    for (index, cell) in cells.iter().enumerate() {
        assert_eq!(doc.style(*cell, "opacity").as_deref(), Some("0"));
        assert_eq!(
            doc.style(*cell, "transform").as_deref(),
            Some("translateY(40px)")
        );
        assert_eq!(
            doc.attr(*cell, "data-animation-delay"),
            Some((index * 100).to_string().as_str())
        );
    }

    let reveals: Vec<_> = decoration
        .observers
        .iter()
        .filter(|t| matches!(t.action, VisibilityAction::RevealCard { .. }))
        .collect();
    assert_eq!(reveals.len(), cells.len());
    for trigger in reveals {
        assert!(trigger.once);
        assert_eq!(trigger.options.threshold, 0.2);
        assert_eq!(trigger.options.bottom_margin_pct, -10);
    }
}

#[test]
fn reveal_fires_after_its_stagger_delay() {
    let (doc, block, decoration) = decorate(&two_row_fixture());
    let cells = doc.all_with_class(block, "facts-figures-cards-cell");
    let config = BlockConfig::facts_figures_cards();
    let mut runtime = BlockRuntime::new(doc, config, decoration);
    let mut sink = NullSink;

    runtime.intersect(cells[0], 0.3, &mut sink);
    runtime.intersect(cells[1], 0.3, &mut sink);
    runtime.advance(0);

    // Cell 0 has no delay; cell 1 waits out its 100ms stagger.
    assert_eq!(runtime.doc().style(cells[0], "opacity").as_deref(), Some("1"));
    assert_eq!(runtime.doc().style(cells[1], "opacity").as_deref(), Some("0"));

    runtime.advance(99);
    assert_eq!(runtime.doc().style(cells[1], "opacity").as_deref(), Some("0"));
    runtime.advance(1);
    assert_eq!(runtime.doc().style(cells[1], "opacity").as_deref(), Some("1"));
    assert_eq!(
        runtime.doc().style(cells[1], "transition").as_deref(),
        Some("opacity 600ms ease-out, transform 600ms ease-out")
    );
    assert_eq!(
        runtime.doc().style(cells[1], "transform").as_deref(),
        Some("translateY(0)")
    );
}

#[test]
fn below_threshold_ratio_does_not_reveal() {
    let (doc, block, decoration) = decorate(&two_row_fixture());
    let cells = doc.all_with_class(block, "facts-figures-cards-cell");
    let mut runtime = BlockRuntime::new(doc, BlockConfig::facts_figures_cards(), decoration);

    runtime.intersect(cells[0], 0.1, &mut NullSink);
    runtime.advance(1000);
    assert_eq!(runtime.doc().style(cells[0], "opacity").as_deref(), Some("0"));
}

#[test]
fn impression_fires_at_most_once_per_block() {
    let (doc, block, decoration) = decorate(
        r#"<div class="facts-figures-cards block variant-h5-short col-3">
            <div><div><h4>1</h4><p>one</p></div></div>
        </div>"#,
    );
    let mut runtime = BlockRuntime::new(doc, BlockConfig::facts_figures_cards(), decoration);
    let mut layer = DataLayer::new();

    runtime.intersect(block, 0.4, &mut layer);
    assert!(layer.is_empty(), "below-threshold entry must not report");

    runtime.intersect(block, 0.6, &mut layer);
    runtime.intersect(block, 0.9, &mut layer);
    runtime.intersect(block, 1.0, &mut layer);

    assert_eq!(
        layer.entries(),
        &[json!({
            "event": "block_impression",
            "block_type": "facts-figures-cards",
            "block_variant": "variant-h5-short col-3",
        })]
    );
}

#[test]
fn impression_variant_defaults_when_block_has_no_options() {
    let (doc, block, decoration) = decorate(&two_row_fixture());
    let mut runtime = BlockRuntime::new(doc, BlockConfig::facts_figures_cards(), decoration);
    let mut layer = DataLayer::new();

    runtime.intersect(block, 0.5, &mut layer);
    assert_eq!(layer.entries()[0]["block_variant"], "default");
}

#[test]
fn link_clicks_report_card_index_and_title() {
    let (doc, block, decoration) = decorate(&two_row_fixture());
    let link = doc.first_with_tag(block, "a").unwrap();
    let mut runtime = BlockRuntime::new(doc, BlockConfig::facts_figures_cards(), decoration);
    let mut layer = DataLayer::new();

    runtime.click(link, &mut layer);

    assert_eq!(
        layer.entries(),
        &[json!({
            "event": "card_interaction",
            "block_type": "facts-figures-cards",
            "card_index": 2,
            "card_title": "7",
            "interaction_type": "click",
        })]
    );
}

#[test]
fn unbound_clicks_are_ignored() {
    let (doc, block, decoration) = decorate(&two_row_fixture());
    let mut runtime = BlockRuntime::new(doc, BlockConfig::facts_figures_cards(), decoration);
    let mut layer = DataLayer::new();

    runtime.click(block, &mut layer);
    assert!(layer.is_empty());
}

#[test]
fn non_element_block_yields_empty_decoration() {
    let mut doc = Document::new();
    let text = doc.create_text("not a block");
    let decoration = facts_figures::decorate(&mut doc, text, &BlockConfig::facts_figures_cards());
    assert_eq!(decoration, Decoration::default());
}

#[test]
fn decoration_registers_no_bindings_for_linkless_blocks() {
    let (_, _, decoration) = decorate(
        r#"<div class="facts-figures-cards block">
            <div><div><h4>1</h4><p>plain</p></div></div>
        </div>"#,
    );
    assert!(
        !decoration
            .bindings
            .iter()
            .any(|b| matches!(b, EventBinding::Click { .. }))
    );
}
