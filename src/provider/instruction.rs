//! Edit instruction sent alongside the source image.

/// Build the recolor instruction for a target color description.
///
/// The description is the only parameter. Everything else is fixed: keep the
/// material, keep the shape, keep the noise down, stay photorealistic, leave
/// the background alone, and answer with an image only.
pub fn build_instruction(target_color: &str) -> String {
    format!(
        "You are an expert product photographer and editor.
Task: Recolor the hair accessory (发饰) in this image to: {target_color}.

STRICT REQUIREMENTS:
1. **Texture Fidelity**: Preserve the EXACT material properties. If it is satin, keep the sheen. If velvet, keep the soft pile. If rhinestone, keep the sharp reflections.
2. **Geometry**: Do not change the shape, size, or position of the accessory.
3. **High Quality & Low Noise**: The output MUST be crystal clear. Aggressively reduce digital noise and grain. Use professional studio lighting aesthetics.
4. **Realism**: The result must be photorealistic.
5. **Background**: Keep the background and surrounding elements (hair, skin) completely unchanged.

Return only the modified image."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_is_embedded_once() {
        let text = build_instruction("metallic gold");
        assert!(text.contains("Recolor the hair accessory (发饰) in this image to: metallic gold."));
        assert_eq!(text.matches("metallic gold").count(), 1);
    }

    #[test]
    fn test_all_requirements_present() {
        let text = build_instruction("#ABCDEF");
        for needle in [
            "Texture Fidelity",
            "Geometry",
            "Low Noise",
            "Realism",
            "Background",
            "Return only the modified image.",
        ] {
            assert!(text.contains(needle), "missing {needle}");
        }
    }

    #[test]
    fn test_description_passed_verbatim() {
        let text = build_instruction("Rose Gold, brushed finish");
        assert!(text.contains("to: Rose Gold, brushed finish."));
    }
}
