//! Hero Teaser: a banner whose first row holds a background picture and
//! whose remaining rows hold eyebrow/title/description text and CTA buttons.
//! Rows are restructured into a background layer plus one content wrapper.

use blocksmith_config::BlockConfig;
use blocksmith_dom::{Document, NodeId};

use crate::blocks::DecorateError;
use crate::classify::is_eyebrow;
use crate::hooks::{
    ClickAction, Decoration, EventBinding, ObserverOptions, VisibilityAction, VisibilityTrigger,
};

/// Class flipped on once the background image has finished loading.
pub(crate) const IMAGE_LOADED_CLASS: &str = "image-loaded";

/// Decorates a hero-teaser block.
///
/// Same boundary contract as the cards block: errors are logged and
/// swallowed, leaving the block partially decorated. The readiness marker
/// (`data-hero-teaser-ready`) is only written on a fully successful pass.
pub fn decorate(doc: &mut Document, block: NodeId, config: &BlockConfig) -> Decoration {
    let mut decoration = Decoration::default();
    if let Err(err) = decorate_block(doc, block, config, &mut decoration) {
        log::error!("hero-teaser block decoration failed: {err}");
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

    add_semantic_classes(doc, block, config)?;
    process_special_content(doc, block, config);
    add_event_listeners(doc, block, config, decoration);
    add_performance_optimizations(doc, block, decoration);
    initialize_block_options(block, decoration);

    doc.set_attr(
        block,
        &format!("data-{}-ready", config.class_name_prefix),
        "true",
    );
    Ok(())
}

/// Steps 1-3: tag background/foreground, classify text, group CTAs, and
/// gather all non-background rows under one content wrapper.
fn add_semantic_classes(
    doc: &mut Document,
    block: NodeId,
    config: &BlockConfig,
) -> Result<(), DecorateError> {
    doc.add_class(block, &config.class("container"));

    let rows = doc.child_elements(block);
    for (index, &row) in rows.iter().enumerate() {
        if index == 0 {
            tag_background(doc, row, config);
        } else {
            for cell in doc.child_elements(row) {
                classify_cell_content(doc, cell, config);
                group_button_containers(doc, cell, config)?;
            }
        }
    }

    let content_rows: Vec<NodeId> = doc.child_elements(block).into_iter().skip(1).collect();
    if !content_rows.is_empty() {
        let wrapper = doc.create_element("div");
        doc.add_class(wrapper, &config.class("content"));
        for row in content_rows {
            doc.append_child(wrapper, row)?;
        }
        doc.append_child(block, wrapper)?;
    }
    Ok(())
}

fn tag_background(doc: &mut Document, row: NodeId, config: &BlockConfig) {
    let Some(&cell) = doc.child_elements(row).first() else {
        return;
    };
    let Some(picture) = doc.first_with_tag(cell, "picture") else {
        return;
    };
    doc.add_class(picture, &config.class("background"));
    if let Some(img) = doc.first_with_tag(picture, "img") {
        doc.add_class(img, &config.class("image"));
    }
}

fn classify_cell_content(doc: &mut Document, cell: NodeId, config: &BlockConfig) {
    // Eyebrow: only the cell's first paragraph is ever a candidate.
    if let Some(&first) = doc.child_elements(cell).first()
        && doc.tag(first) == Some("p")
    {
        let text = doc.text_content(first);
        let has_link = doc.first_with_tag(first, "a").is_some();
        if is_eyebrow(&text, has_link) {
            doc.add_class(first, &config.class("eyebrow"));
        }
    }

    if let Some(heading) = doc.first_heading(cell) {
        doc.add_class(heading, &config.class("title"));
    }

    for paragraph in doc.all_with_tag(cell, "p") {
        if doc.has_class(paragraph, "button-container")
            || doc.has_class(paragraph, &config.class("eyebrow"))
        {
            continue;
        }
        if doc.first_with_tag(paragraph, "a").is_none()
            && !doc.text_content(paragraph).trim().is_empty()
        {
            doc.add_class(paragraph, &config.class("description"));
        }
    }
}

/// Moves every `.button-container` into a lazily created actions wrapper;
/// the first container's anchor becomes the primary CTA, the rest secondary,
/// by container order in the source.
fn group_button_containers(
    doc: &mut Document,
    cell: NodeId,
    config: &BlockConfig,
) -> Result<(), DecorateError> {
    let containers = doc.all_with_class(cell, "button-container");
    if containers.is_empty() {
        return Ok(());
    }

    let actions = match doc.first_with_class(cell, &config.class("actions")) {
        Some(existing) => existing,
        None => {
            let wrapper = doc.create_element("div");
            doc.add_class(wrapper, &config.class("actions"));
            doc.append_child(cell, wrapper)?;
            wrapper
        }
    };

    for (index, container) in containers.into_iter().enumerate() {
        if let Some(button) = doc.first_with_tag(container, "a") {
            let role = if index == 0 {
                config.class("primary-cta")
            } else {
                config.class("secondary-cta")
            };
            doc.add_class(button, &role);
        }
        doc.append_child(actions, container)?;
    }
    Ok(())
}

/// Step 4: ARIA roles and labels.
fn process_special_content(doc: &mut Document, block: NodeId, config: &BlockConfig) {
    let title = doc.first_with_class(block, &config.class("title"));
    if let Some(title) = title {
        doc.set_attr(title, "role", "heading");
        if let Some(level) = doc.heading_level(title) {
            doc.set_attr(title, "aria-level", &level.to_string());
        }
    }

    if let Some(content) = doc.first_with_class(block, &config.class("content")) {
        doc.set_attr(content, "role", "main");
        // The fallback id is never assigned anywhere; kept as-is on purpose.
        let labelled_by = title
            .and_then(|t| doc.attr(t, "id"))
            .filter(|id| !id.is_empty())
            .unwrap_or("hero-title")
            .to_string();
        doc.set_attr(content, "aria-labelledby", &labelled_by);
    }

    if let Some(image) = doc.first_with_class(block, &config.class("image")) {
        doc.set_attr(image, "role", "img");
        if doc.attr(image, "alt").is_none_or(str::is_empty) {
            doc.set_attr(image, "alt", "Hero background image");
        }
    }

    // Synthesized labels follow DOM order, not the primary/secondary class.
    for (index, button) in button_anchors(doc, block).into_iter().enumerate() {
        if doc.attr(button, "aria-label").is_none_or(str::is_empty) {
            let text = doc.text_content(button).trim().to_string();
            let kind = if index == 0 { "Primary" } else { "Secondary" };
            doc.set_attr(button, "aria-label", &format!("{text} - {kind} action"));
        }
    }
}

/// Steps 5-6: image-load class flip, CTA analytics, keyboard activation.
fn add_event_listeners(
    doc: &mut Document,
    block: NodeId,
    config: &BlockConfig,
    decoration: &mut Decoration,
) {
    if let Some(image) = doc.first_with_class(block, &config.class("image")) {
        decoration.bind(EventBinding::ImageLoad { image, block });
    }

    for (position, button) in button_anchors(doc, block).into_iter().enumerate() {
        decoration.bind(EventBinding::Click {
            target: button,
            action: ClickAction::HeroCta { position },
        });
        decoration.bind(EventBinding::Keydown { target: button });
    }
}

/// Step 7: deferred images get a default-options lazy-load trigger.
fn add_performance_optimizations(doc: &mut Document, block: NodeId, decoration: &mut Decoration) {
    for image in doc.all_with_tag(block, "img") {
        if doc.attr(image, "data-src").is_some() {
            decoration.observe(VisibilityTrigger {
                target: image,
                options: ObserverOptions::default(),
                action: VisibilityAction::LoadDeferredImage,
                once: true,
            });
        }
    }
}

/// Step 8: responsive screen-size tracking, updated by the host on resize.
fn initialize_block_options(block: NodeId, decoration: &mut Decoration) {
    decoration.bind(EventBinding::Resize { block });
}

fn button_anchors(doc: &Document, block: NodeId) -> Vec<NodeId> {
    doc.find_all(block, |doc, id| {
        doc.tag(id) == Some("a") && doc.has_class(id, "button")
    })
}
