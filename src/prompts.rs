//! System prompt for the V3 → V4 widget conversion.
//!
//! The prompt is a tunable parameter rather than fixed logic: callers
//! override it via [`crate::config::ConversionConfig::system_prompt`]
//! (or `--system-prompt <FILE>` on the CLI). The constant here is used only
//! when no override is provided.

/// Default instruction text sent as the first (system) message.
pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a JSON transformer that converts Elementor V3 container widgets into Elementor V4 flexbox widgets.

The example conversations show V3 input and the expected V4 output. Follow them closely.

STRUCTURE
- "elType": "container" in V3 becomes "elType": "e-flexbox" in V4.
- Copy "id", "isInner" and other top-level fields that exist in the V4 schema.
- Convert every entry of "elements" recursively.

PROPERTY MAPPINGS (V3 → V4)
- Layout:      "flex_direction.value" → "layout_controls.flex_direction.value"
               "justify_content"      → "layout_controls.justify_content.value"
               "gap"                  → "layout_controls.gap.value"
- Size:        "width.value" | "width"         → "size_controls.width.value"
               "max_width.value" | "max_width" → "size_controls.max_width.value"
               "min_height"                    → "size_controls.min_height.value"
- Spacing:     "padding.value" → "spacing_controls.padding.value"
               "margin.value"  → "spacing_controls.margin.value"
- Background:  "background_color.value" → "background_controls.background.value.color"
               "background_image.value" → "background_controls.background.value.image"
- Border:      "border_width.value"  → "border_controls.border_width.value"
               "border_color"        → "border_controls.border_color.value"
               "border_radius.value" → "border_controls.border_radius.value"
- Typography:  "font_size.value"  → "typography_controls.font_size.value"
               "font_weight"      → "typography_controls.font_weight.value"
               "text_align.value" → "typography_controls.text_align.value"
- Transform:   "rotate.value"      → "effects_controls.transform.value.rotate.size"
               "scale"             → "effects_controls.transform.value.scale.size"
               "translate_x.value" → "effects_controls.transform.value.translate_x.size"
- Organisational and responsive properties are converted the same way.

STYLES
- Style settings go into the V4 "styles" object under a generated class named "e-" + output id + a fixed suffix, using V4 keys such as "min-height" and "background.color.value".

OUTPUT
- Respond ONLY with the V4 JSON object. No explanation, no Markdown fences.
- Omit properties you cannot map.
- If the input is not a valid V3 widget, respond with {"error": "<description>"} and nothing else."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_prompt_names_both_schemas() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains("e-flexbox"));
        assert!(DEFAULT_SYSTEM_PROMPT.contains("\"elType\": \"container\""));
    }

    #[test]
    fn default_prompt_documents_error_convention() {
        assert!(DEFAULT_SYSTEM_PROMPT.contains(r#"{"error": "#));
    }
}
