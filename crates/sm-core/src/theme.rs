//! Popup presentation: palettes, arrow style, and the generated stylesheet.
//!
//! Both themes live in one stylesheet. Dark mode is a class toggle on the
//! menu element, so switching never rebuilds the DOM or touches visibility.

pub const MENU_ELEMENT_ID: &str = "selection-menu";
pub const DARK_THEME_CLASS: &str = "dark-theme";
/// Custom property the button labels read their font family from.
pub const FONT_FAMILY_PROPERTY: &str = "--selection-menu-font-family";

/// Height of the arrow indicator between menu and selection, in px.
pub const ARROW_HEIGHT: f64 = 8.0;
/// Width of the arrow indicator's base, in px.
pub const ARROW_WIDTH: f64 = 16.0;

/// How the arrow indicator is drawn. Behaviour is identical; only the
/// generated CSS differs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArrowStyle {
    /// Border triangle, with the whole menu under a drop-shadow filter.
    #[default]
    DropShadow,
    /// A 45° rotated square tucked half under the menu body.
    RotatedSquare,
}

/// Colors for one theme.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub background: &'static str,
    pub separator: &'static str,
    pub text: &'static str,
    pub hover: &'static str,
}

impl Palette {
    pub fn light() -> Self {
        Self {
            background: "white",
            separator: "#ddd",
            text: "#222",
            hover: "#8bb8dc",
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#2e2f38",
            separator: "#43444c",
            text: "#fff",
            hover: "#0078d6",
        }
    }

    fn custom_properties(&self) -> String {
        let bg = self.background;
        format!(
            "--menu-bg: {bg}; --menu-separator: {sep}; --menu-text: {text}; --menu-hover: {hover}; \
             --arrow-down: {bg} transparent transparent transparent; \
             --arrow-up: transparent transparent {bg} transparent;",
            sep = self.separator,
            text = self.text,
            hover = self.hover,
        )
    }
}

/// The full presentation theme of the popup.
#[derive(Debug, Clone, PartialEq)]
pub struct MenuTheme {
    pub arrow: ArrowStyle,
    pub light: Palette,
    pub dark: Palette,
}

impl Default for MenuTheme {
    fn default() -> Self {
        Self {
            arrow: ArrowStyle::default(),
            light: Palette::light(),
            dark: Palette::dark(),
        }
    }
}

impl MenuTheme {
    pub fn with_arrow(arrow: ArrowStyle) -> Self {
        Self {
            arrow,
            ..Self::default()
        }
    }

    /// Generate the `<style>` contents. `font_family` is the initial
    /// fallback; live changes go through `FONT_FAMILY_PROPERTY`.
    pub fn stylesheet(&self, font_family: &str) -> String {
        let id = MENU_ELEMENT_ID;
        let dark = DARK_THEME_CLASS;
        let font = sanitize_font_family(font_family);
        let font_var = FONT_FAMILY_PROPERTY;
        let light_vars = self.light.custom_properties();
        let dark_vars = self.dark.custom_properties();
        let (filter, arrow_rule) = match self.arrow {
            ArrowStyle::DropShadow => (
                "drop-shadow(0 2px 4px rgba(0,0,0,0.35))",
                format!(
                    "#{id}::after {{ border-color: var(--arrow); border-style: solid; \
                     border-width: {h}px; content: \"\"; height: 0; width: 0; \
                     left: var(--arrow-left, 50%); margin-left: -{h}px; pointer-events: none; \
                     position: absolute; top: var(--arrow-top, 100%); }}",
                    h = ARROW_HEIGHT,
                ),
            ),
            ArrowStyle::RotatedSquare => (
                "none",
                format!(
                    "#{id}::after {{ background: var(--menu-bg); content: \"\"; \
                     box-shadow: 2px 2px 3px rgba(0,0,0,0.2); height: {side:.3}px; width: {side:.3}px; \
                     left: var(--arrow-left, 50%); top: var(--arrow-center-top, 100%); \
                     pointer-events: none; position: absolute; \
                     transform: translate(-50%, -50%) rotate(45deg); z-index: -1; }}",
                    side = ARROW_HEIGHT * std::f64::consts::SQRT_2,
                ),
            ),
        };

        format!(
            "#{id} {{ {light_vars} --arrow: var(--arrow-down); \
             background: transparent none repeat scroll 0% 0%; border-radius: 0; border-style: none; \
             box-shadow: none; filter: {filter}; font-family: sans-serif; font-size: medium; \
             font-stretch: normal; font-style: normal; font-variant: normal; font-weight: normal; \
             height: auto; letter-spacing: normal; line-height: normal; margin: 0; overflow: visible; \
             padding: 0; position: fixed; text-indent: 0; text-transform: none; width: auto; \
             word-spacing: normal; z-index: 99999; }}\n\
             {arrow_rule}\n\
             #{id} ul {{ background-color: var(--menu-bg); display: inline-block; list-style: none; \
             margin: 0; padding: 3px 0; white-space: nowrap; }}\n\
             #{id} li {{ border-right: 1px solid var(--menu-separator); display: inline-block; \
             padding: 0 3px; }}\n\
             #{id} li:last-child {{ border-right: 0; }}\n\
             #{id} span {{ color: var(--menu-text); cursor: default; display: inline-block; \
             font-family: var({font_var}, {font}), sans-serif; font-size: 13px; line-height: 18px; \
             padding: 3px 7px; }}\n\
             #{id} span:hover {{ background-color: var(--menu-hover); }}\n\
             #{id}.{dark} {{ {dark_vars} }}\n"
        )
    }
}

/// Keep a user-supplied font family from escaping its declaration.
fn sanitize_font_family(font_family: &str) -> String {
    let cleaned: String = font_family
        .chars()
        .filter(|c| !matches!(c, '{' | '}' | ';' | '<' | '>' | '\\'))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        crate::settings::DEFAULT_FONT_FAMILY.to_string()
    } else {
        cleaned.to_string()
    }
}
