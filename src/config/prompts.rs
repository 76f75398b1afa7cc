//! Prompt templates for Skriv.
//!
//! Prompts can be customized by placing TOML files in the custom prompts
//! directory. Templates use `{{variable}}` placeholders.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub titles: TitlePrompts,
    pub script: ScriptPrompts,
    pub seo: SeoPrompts,
    pub image_prompts: ImagePromptPrompts,
    pub thumbnail: ThumbnailPrompts,
    pub voice: VoicePrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: std::collections::HashMap<String, String>,
}

/// Prompt for title batch generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TitlePrompts {
    pub user: String,
}

impl Default for TitlePrompts {
    fn default() -> Self {
        Self {
            user: r#"Based on the following content about the topic "{{topic}}" in the language "{{language}}", create {{count}} compelling YouTube titles.

CONTENT:
---
{{content}}
---

MANDATORY REQUIREMENTS:
1. Follow these viral title formulas:
   - [CURIOSITY HOOK] + [SPECIFIC PROBLEM] + [UNEXPECTED RESULT]
   - [SPECIFIC NUMBER] + [PROBLEM OR SOLUTION] + [BENEFIT OR CONSEQUENCE] (prefer odd numbers like 3, 5, 7)
   - [NEGATION - WARNING] + [SOMETHING EVERYONE DOES]
   - [QUESTION OR EMOTIONALLY PROVOCATIVE KEYWORD]
   - [TARGET AUDIENCE NAME] + [HABIT / SECRET]
2. Use strong emotional keywords such as "unexpected", "terrifying", "secret", "wealthy", "wake up".
3. Keep titles short (at most 39 characters where possible) while staying honest.
4. For each title, provide a "trendScore" from 1 to 100 rating its viral potential.

The output must be a valid JSON string."#
                .to_string(),
        }
    }
}

/// Prompts for script generation.
///
/// `user` is the outer template; one of the two guidance templates is
/// rendered into its `{{content_guidance}}` slot depending on whether the
/// script is derived from source material or generated freely.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptPrompts {
    pub user: String,
    pub derived_guidance: String,
    pub free_guidance: String,
}

impl Default for ScriptPrompts {
    fn default() -> Self {
        Self {
            user: r#"Create a detailed video script in the language "{{language}}" for the YouTube title: "{{title}}".

{{content_guidance}}

STRUCTURE REQUIREMENTS:
1. Divide the script into exactly {{section_count}} MAJOR sections.
2. Each MAJOR section must be around {{words_per_section}} words.
3. The output structure must strictly follow this format:
   - The first line is the main Title of the video.
   - Each MAJOR section must start with a compelling section heading. IMPORTANT: the heading must NOT carry a prefix such as "Section heading 1:", "Part 1:", and so on. Write only the actual heading.
   - The heading is followed by the detailed content. MANDATORY: this content must be split into several short paragraphs, each separated by a blank line.
   - MAJOR sections (heading plus content) are also separated by a blank line.

FORMAT EXAMPLE:
{{title}}

[a compelling heading for part 1]
First paragraph of part 1...

Second paragraph of part 1...

[a compelling heading for part 2]
First paragraph of part 2...

IMPORTANT NOTE:
- Return plain text only, without any special characters such as markdown (*, #, _, etc.)."#
                .to_string(),

            derived_guidance: r#"CONTENT REQUIREMENTS:
- You MUST develop the script from the ORIGINAL CONTENT provided below.
- Apply the customization option "{{mode}}" directly to the ORIGINAL CONTENT:
    - 'Expand': expand the main ideas from the original content, adding examples, explanations and related details to enrich the script.
    - 'Retain 70%': distill and summarize the ORIGINAL CONTENT, keeping only roughly 70% of the most important, core ideas.
    - 'Deepen': analyze the aspects of the ORIGINAL CONTENT in depth, use domain terminology, make complex arguments and explore the topics at an expert level.

ORIGINAL CONTENT:
---
{{original_content}}
---"#
                .to_string(),

            free_guidance: r#"CONTENT REQUIREMENTS:
- Create the content freely based on the title.
- Apply the customization option "{{mode}}" to the content you create:
    - 'Expand': write somewhat longer content with supporting details and examples.
    - 'Retain 70%': condense the content, keeping only the 70% most important ideas.
    - 'Deepen': go deep into the analysis, using domain terminology and complex arguments."#
                .to_string(),
        }
    }
}

/// Prompt for SEO metadata generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SeoPrompts {
    pub user: String,
}

impl Default for SeoPrompts {
    fn default() -> Self {
        Self {
            user: r#"Based on the title "{{title}}" and the following script content in the language "{{language}}", create standard SEO metadata for a YouTube video.

SCRIPT:
---
{{script_excerpt}}...
---

REQUIREMENTS:
1.  **description**: write a compelling, SEO-friendly, trustworthy description. It must be clearly segmented with sensible line breaks for readability, and end with a strong call to action (CTA).
2.  **hashtags**: provide a string of related hashtags, each starting with # and separated by spaces.
3.  **tags**: provide a string of related tags (keywords), separated by commas.

The output must be a valid JSON string."#
                .to_string(),
        }
    }
}

/// Prompt for per-section image prompt generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImagePromptPrompts {
    pub user: String,
}

impl Default for ImagePromptPrompts {
    fn default() -> Self {
        Self {
            user: r#"Based on the entire video script below in the language "{{language}}", create detailed prompts for AI image generation.

VIDEO SCRIPT:
---
{{script}}
---

MANDATORY REQUIREMENTS:
1.  Identify the major sections of the script (each section usually starts with a short heading line).
2.  For EACH identified section, create exactly {{prompts_per_section}} image prompts.
3.  Each prompt must describe an image containing a text overlay.
4.  The text overlay content must be the key message or a short, compelling quote from the corresponding script section. The text overlay must be written in the language "{{language}}".
5.  State that the text overlay color must contrast strongly with the background to maximize click-through rate (CTR).
6.  Prompts must be detailed, cinematic and visually engaging.
7.  The visual style must be: "{{style}}".

The output must be a valid JSON string containing a single array of all generated prompt strings."#
                .to_string(),
        }
    }
}

/// Prompts for thumbnail generation, including the vision round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailPrompts {
    pub user: String,
    /// Vision prompt used to describe an uploaded reference image.
    pub vision: String,
    /// Style block when no reference image is provided.
    pub style_default: String,
    /// Style block when the vision call produced a description.
    pub style_replicate: String,
    /// Style block when the vision call failed (file-name fallback).
    pub style_fallback: String,
    /// Optional watermark block appended when a watermark is requested.
    pub watermark: String,
}

impl Default for ThumbnailPrompts {
    fn default() -> Self {
        Self {
            user: r#"Generate a professional YouTube thumbnail based on the following requirements. The output image MUST strictly adhere to the specified aspect ratio.

- Video Title: "{{title}}"
- Video Content Summary: "{{script_excerpt}}..."
- Language for all text: "{{language}}"

**Core Instructions:**

1.  **Primary Text Overlay**:
    - The thumbnail MUST feature the exact text: "{{title}}".
    - This text should be the main focus, large, bold, and easy to read.
    - Use a color palette for the text that has extremely high contrast against the background to maximize Click-Through Rate (CTR).

2.  **Imagery & Composition**:
    - Create an image based on the title and content summary.
    - The background image must be dynamic, emotionally engaging, and directly reflect the video's title and content.
    - The composition should be professional, adding or removing details as necessary to make the central subject and text stand out dramatically.

3.  **Visual Style**:
    {{style_guidance}}

{{watermark_block}}"#
                .to_string(),

            vision: r#"Describe the visual style, color palette, composition, mood, and key elements of this image in detail. This description will be used to guide an image generation AI to create a similar image. Be very specific about artistic style (e.g., 'photorealistic', 'cinematic', 'anime', 'fantasy art') and lighting."#
                .to_string(),

            style_default: r#"The overall visual style must be "{{style}}"."#.to_string(),

            style_replicate:
                r#"Replicate the following visual style as closely as possible: "{{style_description}}"."#
                    .to_string(),

            style_fallback: r#"The overall visual style (colors, composition, mood) should be inspired by the provided sample image file named {{file_name}}, while adhering to a general "{{style}}" feel."#
                .to_string(),

            watermark: r#"4.  **Watermark Requirement**:
    - The thumbnail MUST include a watermark with the exact text: "{{watermark_text}}".
    - The watermark should be placed in a corner (e.g., bottom right).
    - The watermark text must be clearly legible, with high-contrast colors against its immediate background. It should be secondary to the main title."#
                .to_string(),
        }
    }
}

/// Voice-related fixed text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VoicePrompts {
    /// Fixed sentence spoken by the demo voice.
    pub demo_text: String,
}

impl Default for VoicePrompts {
    fn default() -> Self {
        Self {
            demo_text: "This is a short voice sample for your reference.".to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&std::collections::HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = PathBuf::from(shellexpand::tilde(dir).to_string());

            let titles_path = custom_path.join("titles.toml");
            if titles_path.exists() {
                let content = std::fs::read_to_string(&titles_path)?;
                prompts.titles = toml::from_str(&content)?;
            }

            let script_path = custom_path.join("script.toml");
            if script_path.exists() {
                let content = std::fs::read_to_string(&script_path)?;
                prompts.script = toml::from_str(&content)?;
            }

            let seo_path = custom_path.join("seo.toml");
            if seo_path.exists() {
                let content = std::fs::read_to_string(&seo_path)?;
                prompts.seo = toml::from_str(&content)?;
            }

            let image_prompts_path = custom_path.join("image_prompts.toml");
            if image_prompts_path.exists() {
                let content = std::fs::read_to_string(&image_prompts_path)?;
                prompts.image_prompts = toml::from_str(&content)?;
            }

            let thumbnail_path = custom_path.join("thumbnail.toml");
            if thumbnail_path.exists() {
                let content = std::fs::read_to_string(&thumbnail_path)?;
                prompts.thumbnail = toml::from_str(&content)?;
            }

            let voice_path = custom_path.join("voice.toml");
            if voice_path.exists() {
                let content = std::fs::read_to_string(&voice_path)?;
                prompts.voice = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    pub fn render(template: &str, vars: &std::collections::HashMap<String, String>) -> String {
        let mut result = template.to_string();
        for (key, value) in vars {
            result = result.replace(&format!("{{{{{}}}}}", key), value);
        }
        result
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(
        &self,
        template: &str,
        vars: &std::collections::HashMap<String, String>,
    ) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompts() {
        let prompts = Prompts::default();
        assert!(!prompts.titles.user.is_empty());
        assert!(!prompts.script.user.is_empty());
        assert!(prompts.script.user.contains("{{content_guidance}}"));
        assert!(!prompts.voice.demo_text.is_empty());
    }

    #[test]
    fn test_render_template() {
        let template = "Title: {{title}}, sections: {{section_count}}.";
        let mut vars = std::collections::HashMap::new();
        vars.insert("title".to_string(), "The Hidden Cost".to_string());
        vars.insert("section_count".to_string(), "5".to_string());

        let result = Prompts::render(template, &vars);
        assert_eq!(result, "Title: The Hidden Cost, sections: 5.");
    }

    #[test]
    fn test_custom_variables_are_overridden_by_call_site() {
        let mut prompts = Prompts::default();
        prompts
            .variables
            .insert("style".to_string(), "Watercolor".to_string());

        let mut vars = std::collections::HashMap::new();
        vars.insert("style".to_string(), "Anime".to_string());

        let rendered = prompts.render_with_custom("style = {{style}}", &vars);
        assert_eq!(rendered, "style = Anime");
    }
}
