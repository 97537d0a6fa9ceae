//! Virtual console to HTML rendering.
//!
//! A [`TreeRenderer`] walks the host tree from a container and writes one
//! markup block per visible direct child into a fresh [`RenderContext`].
//! Per-kind CSS/JS is pulled in through the context's [`AssetLedger`] the
//! first time a kind is emitted, so a page carries each fragment once no
//! matter how many widgets share it.
//!
//! Contexts are created per render call and never shared between requests.

pub mod assets;
pub mod pages;

pub use pages::{
    config_page, console_page, fixture_stored_page, loading_page, system_page, APP_NAME,
};

use crate::domain::chaser::{speed_to_string, Chaser, SpeedColumn, INFINITE_SPEED};
use crate::domain::widget::{KindTag, Widget, WidgetKind};
use crate::ports::WidgetTree;
use crate::ws::subscriptions::NotificationRegistry;
use std::collections::HashSet;
use std::fmt::Write as _;
use tracing::{debug, trace};

/// Border of plain frames
const FRAME_BORDER: &str = "#5a5a5a";
/// Border of solo frames
const SOLO_FRAME_BORDER: &str = "#ff0000";
/// Extra style of a button that is on
const BUTTON_ON_CSS: &str = "border: 3px solid #00E600;";
const INFINITY_GLYPH: &str = "&#8734;";

/// Escape text for HTML element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Widget kinds whose assets were already emitted in one render pass.
#[derive(Debug, Default)]
pub struct AssetLedger {
    emitted: HashSet<KindTag>,
}

impl AssetLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `tag` as emitted. Returns `true` only the first time.
    pub fn mark(&mut self, tag: KindTag) -> bool {
        self.emitted.insert(tag)
    }

    pub fn contains(&self, tag: KindTag) -> bool {
        self.emitted.contains(&tag)
    }

    pub fn len(&self) -> usize {
        self.emitted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.emitted.is_empty()
    }
}

/// State of one render pass: asset ledger plus the three output buffers.
#[derive(Debug, Default)]
pub struct RenderContext {
    ledger: AssetLedger,
    css: String,
    js: String,
    body: String,
}

impl RenderContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the kind's CSS/JS unless this pass already has it
    fn include_assets(&mut self, tag: KindTag) {
        if self.ledger.mark(tag) {
            trace!(kind = ?tag, "Including widget assets");
            self.css.push_str(assets::css_for(tag));
            self.js.push_str(assets::js_for(tag));
        }
    }

    pub fn ledger(&self) -> &AssetLedger {
        &self.ledger
    }

    pub fn css(&self) -> &str {
        &self.css
    }

    pub fn js(&self) -> &str {
        &self.js
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// Renders the host's virtual console.
///
/// Every interactive widget it emits is subscribed in the registry so the
/// host's later changes to it are pushed to the browser.
pub struct TreeRenderer<'a> {
    tree: &'a dyn WidgetTree,
    registry: &'a NotificationRegistry,
}

impl<'a> TreeRenderer<'a> {
    pub fn new(tree: &'a dyn WidgetTree, registry: &'a NotificationRegistry) -> Self {
        Self { tree, registry }
    }

    /// Render the children of `root`. A missing root yields an empty body.
    pub fn render(&self, root: Option<&Widget>) -> RenderContext {
        let mut ctx = RenderContext::new();
        match root {
            Some(root) => self.children(root, &mut ctx),
            None => debug!("No console loaded, rendering empty body"),
        }
        ctx
    }

    /// Visible widgets whose direct parent is `container`, in tree order
    fn children(&self, container: &Widget, ctx: &mut RenderContext) {
        let ids = self.tree.children(container.id);
        trace!(container = %container.id, candidates = ids.len(), "Rendering children");

        for id in ids {
            // Deleted since the listing
            let Some(widget) = self.tree.widget(id) else {
                continue;
            };
            if widget.parent != Some(container.id) || !widget.visible {
                continue;
            }
            self.widget(&widget, ctx);
        }
    }

    fn widget(&self, widget: &Widget, ctx: &mut RenderContext) {
        match &widget.kind {
            WidgetKind::Frame { header_visible } => {
                self.frame(widget, *header_visible, KindTag::Frame, ctx)
            }
            WidgetKind::SoloFrame { header_visible } => {
                self.frame(widget, *header_visible, KindTag::SoloFrame, ctx)
            }
            WidgetKind::Button { on } => self.button(widget, *on, ctx),
            WidgetKind::Slider { value } => self.slider(widget, *value, ctx),
            WidgetKind::Label => self.label(widget, ctx),
            WidgetKind::AudioTriggers => self.audio_triggers(widget, ctx),
            WidgetKind::CueList { chaser } => self.cue_list(widget, chaser.as_ref(), ctx),
            WidgetKind::Generic => self.generic(widget, ctx),
        }

        if widget.tag().is_interactive() {
            self.registry.subscribe(widget.id);
        }
    }

    fn frame(&self, frame: &Widget, header_visible: bool, tag: KindTag, ctx: &mut RenderContext) {
        let (class, border) = match tag {
            KindTag::SoloFrame => ("vcsoloframe", SOLO_FRAME_BORDER),
            _ => ("vcframe", FRAME_BORDER),
        };
        let g = frame.geometry;

        let _ = write!(
            ctx.body,
            "<div class=\"{class}\" style=\"left: {}px; top: {}px; width: {}px; height: {}px; \
             background-color: {}; border-radius: 4px;\nborder: 1px solid {border};\">\n",
            g.x, g.y, g.width, g.height, frame.background
        );

        if header_visible {
            ctx.include_assets(tag);
            let _ = writeln!(
                ctx.body,
                "<div class=\"{class}Header\" style=\"color:{}\">{}</div>",
                frame.foreground,
                escape_html(&frame.caption)
            );
        }

        self.children(frame, ctx);
        ctx.body.push_str("</div>\n");
    }

    fn button(&self, button: &Widget, on: bool, ctx: &mut RenderContext) {
        ctx.include_assets(KindTag::Button);
        let g = button.geometry;
        let id = button.id;
        let on_css = if on { BUTTON_ON_CSS } else { "" };

        let _ = write!(
            ctx.body,
            "<div class=\"vcbutton-wrapper\" style=\"left: {}px; top: {}px;\">\n\
             <a class=\"vcbutton\" id=\"{id}\" href=\"javascript:buttonClick({id});\" \
             style=\"width: {}px; height: {}px; color: {}; background-color: {}; {on_css}\">{}</a>\n\
             </div>\n",
            g.x,
            g.y,
            g.width,
            g.height,
            button.foreground,
            button.background,
            escape_html(&button.caption)
        );
    }

    fn slider(&self, slider: &Widget, value: u8, ctx: &mut RenderContext) {
        ctx.include_assets(KindTag::Slider);
        let g = slider.geometry;
        let id = slider.id;

        let _ = write!(
            ctx.body,
            "<div class=\"vcslider\" style=\"left: {}px; top: {}px; width: {}px; height: {}px; \
             background-color: {};\">\n",
            g.x, g.y, g.width, g.height, slider.background
        );
        let _ = writeln!(
            ctx.body,
            "<div id=\"slv{id}\" class=\"vcslLabel\" style=\"top:0px;\">{value}</div>"
        );
        let _ = writeln!(
            ctx.body,
            "<input type=\"range\" class=\"vVertical\" id=\"{id}\" onchange=\"slVchange({id});\" \
             style=\"width: {track}px; margin-top: {track}px; margin-left: {}px;\" \
             min=\"0\" max=\"255\" step=\"1\" value=\"{value}\" />",
            g.width / 2,
            track = g.height - 50,
        );
        let _ = write!(
            ctx.body,
            "<div id=\"sln{id}\" class=\"vcslLabel\" style=\"bottom:0px;\">{}</div>\n</div>\n",
            escape_html(&slider.caption)
        );
    }

    fn label(&self, label: &Widget, ctx: &mut RenderContext) {
        ctx.include_assets(KindTag::Label);
        let g = label.geometry;

        let _ = write!(
            ctx.body,
            "<div class=\"vclabel-wrapper\" style=\"left: {}px; top: {}px;\">\n\
             <div class=\"vclabel\" style=\"width: {}px; height: {}px; color: {}; \
             background-color: {}\">{}</div>\n</div>\n",
            g.x,
            g.y,
            g.width,
            g.height,
            label.foreground,
            label.background,
            escape_html(&label.caption)
        );
    }

    fn audio_triggers(&self, triggers: &Widget, ctx: &mut RenderContext) {
        ctx.include_assets(KindTag::AudioTriggers);
        let g = triggers.geometry;
        let id = triggers.id;

        let _ = write!(
            ctx.body,
            "<div class=\"vcaudiotriggers\" style=\"left: {}px; top: {}px; width: {}px; \
             height: {}px; background-color: {};\">\n",
            g.x, g.y, g.width, g.height, triggers.background
        );
        let _ = writeln!(
            ctx.body,
            "<div class=\"vcaudioHeader\" style=\"color:{}\">{}</div>",
            triggers.foreground,
            escape_html(&triggers.caption)
        );
        let _ = write!(
            ctx.body,
            "<div class=\"vcatbutton-wrapper\">\n\
             <a class=\"vcatbutton\" id=\"{id}\" href=\"javascript:atButtonClick({id});\" \
             style=\"width: {}px; height: {}px;\">Enable</a>\n</div></div>\n",
            g.width - 2,
            g.height - 42
        );
    }

    fn cue_list(&self, cue: &Widget, chaser: Option<&Chaser>, ctx: &mut RenderContext) {
        ctx.include_assets(KindTag::CueList);
        let g = cue.geometry;
        let id = cue.id;

        let _ = write!(
            ctx.body,
            "<div id=\"{id}\" class=\"vccuelist\" style=\"left: {}px; top: {}px; width: {}px; \
             height: {}px; background-color: {};\">\n",
            g.x, g.y, g.width, g.height, cue.background
        );
        let _ = writeln!(
            ctx.body,
            "<div style=\"width: 100%; height: {}px; overflow: scroll;\" >",
            g.height - 32
        );
        ctx.body
            .push_str("<table class=\"hovertable\" style=\"width: 100%;\">\n");
        ctx.body.push_str(
            "<tr><th>#</th><th>Name</th><th>Fade In</th><th>Fade Out</th>\
             <th>Duration</th><th>Notes</th></tr>\n",
        );

        if let Some(chaser) = chaser {
            for (index, step) in chaser.steps.iter().enumerate() {
                let Some(name) = self.tree.function_name(step.function) else {
                    debug!(widget_id = %id, step = index, function = step.function, "Skipping step of deleted function");
                    continue;
                };

                let _ = writeln!(
                    ctx.body,
                    "<tr id=\"{id}_{index}\" onclick=\"enableCue({id}, {index});\" \
                     onmouseover=\"this.style.backgroundColor='#CCD9FF';\" \
                     onmouseout=\"checkMouseOut({id}, {index});\">"
                );
                let _ = write!(
                    ctx.body,
                    "<td>{}</td><td>{}</td>",
                    index + 1,
                    escape_html(&name)
                );
                for column in [SpeedColumn::FadeIn, SpeedColumn::FadeOut, SpeedColumn::Duration] {
                    ctx.body
                        .push_str(&speed_cell(chaser.speed_for(step, column)));
                }
                let _ = write!(ctx.body, "<td>{}</td>\n</tr>\n", escape_html(&step.note));
            }
        }

        ctx.body.push_str("</table>\n</div>\n");
        for (verb, label) in [("PLAY", "Play"), ("PREV", "Previous"), ("NEXT", "Next")] {
            let span_id = if verb == "PLAY" {
                format!(" id=\"play{id}\"")
            } else {
                String::new()
            };
            let _ = write!(
                ctx.body,
                "<a class=\"button button-blue\" style=\"height: 29px; font-size: 24px;\" \
                 href=\"javascript:sendCueCmd({id}, '{verb}');\">\n<span{span_id}>{label}</span></a>\n"
            );
        }
        ctx.body.push_str("</div>\n");
    }

    fn generic(&self, widget: &Widget, ctx: &mut RenderContext) {
        ctx.include_assets(KindTag::Generic);
        let g = widget.geometry;

        let _ = write!(
            ctx.body,
            "<div class=\"vcwidget\" style=\"left: {}px; top: {}px; width: {}px; height: {}px; \
             background-color: {};\">\nWidget not supported (yet) for web access</div>\n",
            g.x, g.y, g.width, g.height, widget.background
        );
    }
}

/// One timing cell of the cue table
fn speed_cell(value: Option<u32>) -> String {
    match value {
        None => "<td></td>".to_string(),
        Some(INFINITE_SPEED) => format!("<td>{INFINITY_GLYPH}</td>"),
        Some(ms) => format!("<td>{}</td>", speed_to_string(ms)),
    }
}
