//! Facts and Figures cards: a grid of statistic cells with heading-level
//! variants, advisory text-length validation, ARIA wiring, staggered entry
//! animation and impression/interaction analytics.

use blocksmith_config::BlockConfig;
use blocksmith_dom::{Document, NodeId};

use crate::blocks::DecorateError;
use crate::classify::{Variant, option_tokens, size_from_tokens};
use crate::hooks::{
    ClickAction, Decoration, EventBinding, ObserverOptions, VisibilityAction, VisibilityTrigger,
};

/// Stagger between neighbouring card reveals.
const CARD_REVEAL_STEP_MS: u64 = 100;

/// Decorates a facts-figures-cards block.
///
/// Never fails outward; on error the partial decoration gathered so far is
/// returned and the problem is logged. Not idempotent: a second invocation
/// would re-tag positional attributes and re-register hooks.
pub fn decorate(doc: &mut Document, block: NodeId, config: &BlockConfig) -> Decoration {
    let mut decoration = Decoration::default();
    if let Err(err) = decorate_block(doc, block, config, &mut decoration) {
        log::error!("facts-figures-cards block decoration failed: {err}");
    }
    decoration
}

fn decorate_block(
    doc: &mut Document,
    block: NodeId,
    config: &BlockConfig,
    decoration: &mut Decoration,
) -> Result<(), DecorateError> {
    if !doc.is_element(block) {
        return Err(DecorateError::BlockNotAnElement(block));
    }

    add_semantic_classes(doc, block, config);
    process_card_content(doc, block, config)?;
    add_accessibility(doc, block, config);
    add_scroll_animations(doc, block, config, decoration);
    add_analytics_tracking(doc, block, config, decoration);
    Ok(())
}

/// Step 1: positional data attributes and stable class hooks for styling.
fn add_semantic_classes(doc: &mut Document, block: NodeId, config: &BlockConfig) {
    doc.add_class(block, &config.class("container"));

    for (row_index, row) in doc.child_elements(block).into_iter().enumerate() {
        doc.add_class(row, &config.class("row"));
        doc.set_attr(row, "data-row-index", &row_index.to_string());

        for (cell_index, cell) in doc.child_elements(row).into_iter().enumerate() {
            doc.add_class(cell, &config.class("cell"));
            doc.set_attr(cell, "data-cell-index", &cell_index.to_string());

            if let Some(title) = doc.first_heading(cell) {
                doc.add_class(title, &config.class("title"));
            }
            if let Some(text) = doc.first_with_tag(cell, "p") {
                doc.add_class(text, &config.class("text"));
            }
        }
    }
}

/// Steps 2-4: derive variant/size, coerce heading levels, validate text.
fn process_card_content(
    doc: &mut Document,
    block: NodeId,
    config: &BlockConfig,
) -> Result<(), DecorateError> {
    let options = block_options(doc, block, config);
    let variant = Variant::from_tokens(options.iter().map(String::as_str));
    let size = size_from_tokens(options.iter().map(String::as_str));

    for cell in doc.all_with_class(block, &config.class("cell")) {
        process_card_cell(doc, cell, &variant, &size, config)?;
    }
    Ok(())
}

fn process_card_cell(
    doc: &mut Document,
    cell: NodeId,
    variant: &Variant,
    size: &str,
    config: &BlockConfig,
) -> Result<(), DecorateError> {
    let Some(title) = doc.first_with_class(cell, &config.class("title")) else {
        return Ok(());
    };

    doc.add_class(cell, &format!("variant-{}", variant.as_str()));
    doc.add_class(cell, &format!("size-{size}"));

    let title = coerce_heading(doc, title, variant.target_tag())?;
    if matches!(variant, Variant::H5Short | Variant::H5Long) {
        doc.add_class(title, variant.as_str());
    }

    validate_character_count(doc, cell, variant, config);
    Ok(())
}

/// Rebuilds the title under the variant's tag when it differs.
///
/// Inner content moves to the fresh element and the class list is carried
/// over; any other authored attributes are intentionally dropped. An exact
/// tag match is left untouched, so re-running performs no replacement.
fn coerce_heading(
    doc: &mut Document,
    title: NodeId,
    target_tag: &str,
) -> Result<NodeId, DecorateError> {
    if doc.tag(title) == Some(target_tag) {
        return Ok(title);
    }
    let Some(parent) = doc.parent(title) else {
        return Ok(title);
    };

    let replacement = doc.create_element(target_tag);
    for child in doc.children(title).to_vec() {
        doc.append_child(replacement, child)?;
    }
    let classes = doc.class_list(title).join(" ");
    doc.set_attr(replacement, "class", &classes);
    doc.replace_child(parent, replacement, title)?;
    Ok(replacement)
}

/// Advisory only: overflow marks the element and logs, never blocks.
fn validate_character_count(doc: &mut Document, cell: NodeId, variant: &Variant, config: &BlockConfig) {
    let Some(text) = doc.first_with_class(cell, &config.class("text")) else {
        return;
    };
    let Some(ceiling) = variant.ceiling(&config.character_ceilings) else {
        return;
    };

    let length = doc.text_content(text).trim().chars().count();
    if length > ceiling {
        log::warn!(
            "text length ({length}) exceeds recommended maximum ({ceiling}) for variant {}",
            variant.as_str()
        );
        doc.set_attr(text, "data-overflow", "true");
    }
}

/// Step 5: region role, generated title ids, described-by links, focusability.
fn add_accessibility(doc: &mut Document, block: NodeId, config: &BlockConfig) {
    doc.set_attr(block, "role", "region");
    doc.set_attr(block, "aria-label", "Facts and Figures");

    for (index, title) in doc
        .all_with_class(block, &config.class("title"))
        .into_iter()
        .enumerate()
    {
        if doc.attr(title, "id").is_none_or(str::is_empty) {
            doc.set_attr(title, "id", &format!("facts-figure-{}", index + 1));
        }
        let Some(title_id) = doc.attr(title, "id").map(str::to_string) else {
            continue;
        };

        if let Some(cell) = doc.parent(title)
            && let Some(text) = doc.first_with_class(cell, &config.class("text"))
        {
            doc.set_attr(text, "aria-describedby", &title_id);
        }
    }

    for cell in doc.all_with_class(block, &config.class("cell")) {
        if doc.first_with_tag(cell, "a").is_some() {
            doc.set_attr(cell, "tabindex", "0");
        }
    }
}

/// Step 6: hide cells and register one-shot reveal triggers.
fn add_scroll_animations(
    doc: &mut Document,
    block: NodeId,
    config: &BlockConfig,
    decoration: &mut Decoration,
) {
    let options = ObserverOptions {
        threshold: 0.2,
        bottom_margin_pct: -10,
    };

    for (index, cell) in doc
        .all_with_class(block, &config.class("cell"))
        .into_iter()
        .enumerate()
    {
        let delay_ms = index as u64 * CARD_REVEAL_STEP_MS;
        doc.set_style(cell, "opacity", "0");
        doc.set_style(cell, "transform", "translateY(40px)");
        doc.set_attr(cell, "data-animation-delay", &delay_ms.to_string());
        decoration.observe(VisibilityTrigger {
            target: cell,
            options,
            action: VisibilityAction::RevealCard { delay_ms },
            once: true,
        });
    }
}

/// Step 7: impression trigger and per-link interaction bindings.
fn add_analytics_tracking(
    doc: &mut Document,
    block: NodeId,
    config: &BlockConfig,
    decoration: &mut Decoration,
) {
    let options = block_options(doc, block, config);
    let variant = if options.is_empty() {
        "default".to_string()
    } else {
        options.join(" ")
    };
    decoration.observe(VisibilityTrigger {
        target: block,
        options: ObserverOptions {
            threshold: 0.5,
            bottom_margin_pct: 0,
        },
        action: VisibilityAction::BlockImpression { variant },
        once: true,
    });

    for (index, cell) in doc
        .all_with_class(block, &config.class("cell"))
        .into_iter()
        .enumerate()
    {
        for link in doc.all_with_tag(cell, "a") {
            decoration.bind(EventBinding::Click {
                target: link,
                action: ClickAction::CardInteraction {
                    cell,
                    card_index: index,
                },
            });
        }
    }
}

fn block_options(doc: &Document, block: NodeId, config: &BlockConfig) -> Vec<String> {
    option_tokens(doc.class_list(block), &config.class_name_prefix)
        .into_iter()
        .map(str::to_string)
        .collect()
}
