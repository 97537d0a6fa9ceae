//! Full HTML documents served by the router.

use super::{assets, escape_html, RenderContext};
use crate::domain::command::{DEFAULT_AUDIO_DEVICE, INVALID_LINE};
use crate::domain::interface::InterfaceRecord;
use crate::domain::widget::Widget;
use crate::network::interface_form;
use crate::ports::{AudioSettings, FixtureStore, IoPatchMap};
use std::fmt::Write as _;

/// Name shown in every page's control bar
pub const APP_NAME: &str = "Q Light Controller Plus";

/// Plugin name used for "not patched"
const NONE_PLUGIN: &str = "None";

const HTML_HEADER: &str = "<!DOCTYPE html>\n<html>\n<head>\n\
<meta name=\"viewport\" content=\"user-scalable=no, initial-scale=1, maximum-scale=1, minimum-scale=1, width=device-width\" />\n\
<meta http-equiv=\"content-type\" content=\"text/html; charset=utf-8\" />\n\
<title>Q Light Controller Plus</title>\n";

fn sw_info() -> String {
    format!(
        "<div class=\"swInfo\">{} {}</div>",
        APP_NAME,
        crate::VERSION
    )
}

fn section_title(title: &str) -> String {
    format!(
        "<div style=\"margin: 30px 7% 10px 7%; font-family: verdana,arial,sans-serif; \
         font-size:20px; text-align:center; color:#CCCCCC;\">{title}</div>\n"
    )
}

/// Assemble header, scripts, styles and body
fn document(js: &str, css: &str, body: &str) -> String {
    format!(
        "{HTML_HEADER}<script type=\"text/javascript\">\n{js}\n</script>\n\
         <style>\n{css}</style>\n</head>\n<body>\n{body}</body>\n</html>"
    )
}

/// Console page around a finished render pass.
///
/// `root` sizes and colors the console area; without one the area is empty.
pub fn console_page(ctx: &RenderContext, root: Option<&Widget>, ws_path: &str) -> String {
    let js = format!("{}{}", assets::channel_js(ws_path), ctx.js());
    let css = format!(
        "body {{ margin: 0px; }}\n{}{}{}",
        assets::HIDDEN_FORM_CSS,
        assets::COMMON_CSS,
        ctx.css()
    );

    let mut body = String::from(
        "<form action=\"/loadProject\" method=\"POST\" enctype=\"multipart/form-data\">\n\
         <input id=\"loadTrigger\" type=\"file\" \
         onchange=\"document.getElementById('submitTrigger').click();\" name=\"qlcprj\" />\n\
         <input id=\"submitTrigger\" type=\"submit\"/></form>\n",
    );
    body.push_str("<div class=\"controlBar\">\n");
    body.push_str(
        "<a class=\"button button-blue\" \
         href=\"javascript:document.getElementById('loadTrigger').click();\">\n\
         <span>Load project</span></a>\n",
    );
    body.push_str("<a class=\"button button-blue\" href=\"/config\"><span>Configuration</span></a>\n");
    body.push_str(&sw_info());
    body.push_str("</div>\n");

    if let Some(root) = root {
        let g = root.geometry;
        let _ = writeln!(
            body,
            "<div style=\"position: relative; width: {}px; height: {}px; background-color: {};\">",
            g.width, g.height, root.background
        );
        body.push_str(ctx.body());
        body.push_str("</div>\n");
    }

    document(&js, &css, &body)
}

/// One patch `<option>` row source: plugin, line label, line index
struct PatchLine {
    plugin: String,
    label: String,
    line: u32,
}

impl PatchLine {
    fn none() -> Self {
        Self {
            plugin: NONE_PLUGIN.to_string(),
            label: NONE_PLUGIN.to_string(),
            line: INVALID_LINE,
        }
    }

    fn option(&self, selected: bool) -> String {
        let line = if self.line == INVALID_LINE {
            "-1".to_string()
        } else {
            self.line.to_string()
        };
        format!(
            "<option value=\"{}|{}\" {}>[{}] {}</option>\n",
            escape_html(&self.plugin),
            line,
            if selected { "selected" } else { "" },
            escape_html(&self.plugin),
            escape_html(&self.label)
        )
    }
}

fn patch_select(cmd: &str, universe: u32, lines: &[PatchLine], current: Option<(&str, u32)>) -> String {
    let current = current.unwrap_or((NONE_PLUGIN, INVALID_LINE));
    let mut html = format!("<td><select onchange=\"ioChanged('{cmd}', {universe}, this.value);\">\n");
    for line in lines {
        let selected = line.plugin == current.0 && line.line == current.1;
        html.push_str(&line.option(selected));
    }
    html.push_str("</select></td>\n");
    html
}

/// Universe patch table
fn io_table(io: &dyn IoPatchMap) -> String {
    let mut plugins = io.input_plugin_names();
    for name in io.output_plugin_names() {
        if !plugins.contains(&name) {
            plugins.push(name);
        }
    }

    let mut inputs = vec![PatchLine::none()];
    let mut outputs = vec![PatchLine::none()];
    let mut feedbacks = vec![PatchLine::none()];

    for plugin in &plugins {
        let feedback = io.plugin_supports_feedback(plugin);
        for (i, label) in io.plugin_inputs(plugin).into_iter().enumerate() {
            inputs.push(PatchLine {
                plugin: plugin.clone(),
                label,
                line: i as u32,
            });
        }
        for (i, label) in io.plugin_outputs(plugin).into_iter().enumerate() {
            if feedback {
                feedbacks.push(PatchLine {
                    plugin: plugin.clone(),
                    label: label.clone(),
                    line: i as u32,
                });
            }
            outputs.push(PatchLine {
                plugin: plugin.clone(),
                label,
                line: i as u32,
            });
        }
    }

    let mut profiles = vec![NONE_PLUGIN.to_string()];
    profiles.extend(io.profile_names());

    let mut html = String::from("<table class=\"hovertable\" style=\"width: 100%;\">\n");
    html.push_str(
        "<tr><th>Universe</th><th>Input</th><th>Output</th><th>Feedback</th><th>Profile</th></tr>\n",
    );

    for universe in 0..io.universes() {
        let input = io.input_patch(universe);
        let output = io.output_patch(universe);
        let feedback = io.feedback_patch(universe);

        let _ = writeln!(
            html,
            "<tr align=center><td>{}</td>",
            escape_html(&io.universe_name(universe))
        );
        html.push_str(&patch_select(
            "INPUT",
            universe,
            &inputs,
            input.as_ref().map(|p| (p.plugin.as_str(), p.input)),
        ));
        html.push_str(&patch_select(
            "OUTPUT",
            universe,
            &outputs,
            output.as_ref().map(|p| (p.plugin.as_str(), p.output)),
        ));
        html.push_str(&patch_select(
            "FB",
            universe,
            &feedbacks,
            feedback.as_ref().map(|p| (p.plugin.as_str(), p.output)),
        ));

        let current_profile = input
            .as_ref()
            .map(|p| p.profile.as_str())
            .unwrap_or(NONE_PLUGIN);
        let _ = writeln!(
            html,
            "<td><select onchange=\"ioChanged('PROFILE', {universe}, this.value);\">"
        );
        for profile in &profiles {
            let selected = if profile == current_profile { "selected" } else { "" };
            let profile = escape_html(profile);
            let _ = writeln!(html, "<option value=\"{profile}\" {selected}>{profile}</option>");
        }
        html.push_str("</select></td>\n</tr>\n");
    }
    html.push_str("</table>\n");
    html
}

/// Audio input/output device table
fn audio_table(audio: &dyn AudioSettings) -> String {
    let input = audio.input_device();
    let output = audio.output_device();
    let default_option =
        format!("<option value=\"{DEFAULT_AUDIO_DEVICE}\">Default device</option>\n");

    let mut input_select = format!(
        "<td><select onchange=\"ioChanged('AUDIOIN', this.value);\">\n{default_option}"
    );
    let mut output_select = format!(
        "<td><select onchange=\"ioChanged('AUDIOOUT', this.value);\">\n{default_option}"
    );

    for device in audio.devices() {
        let value = escape_html(&device.private_name);
        let name = escape_html(&device.device_name);
        if device.input {
            let selected = input.as_deref() == Some(device.private_name.as_str());
            let _ = writeln!(
                input_select,
                "<option value=\"{value}\" {}>{name}</option>",
                if selected { "selected" } else { "" }
            );
        }
        if device.output {
            let selected = output.as_deref() == Some(device.private_name.as_str());
            let _ = writeln!(
                output_select,
                "<option value=\"{value}\" {}>{name}</option>",
                if selected { "selected" } else { "" }
            );
        }
    }
    input_select.push_str("</select></td>\n");
    output_select.push_str("</select></td>\n");

    format!(
        "<table class=\"hovertable\" style=\"width: 100%;\">\n\
         <tr><th>Input</th><th>Output</th></tr>\n\
         <tr align=center>{input_select}{output_select}</tr>\n</table>\n"
    )
}

fn is_fixture_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    lower.ends_with(".qxf") || lower.ends_with(".d4")
}

/// User fixture list; empty when the definition directory is unavailable
fn fixtures_table(fixtures: &dyn FixtureStore) -> String {
    let Some(files) = fixtures.user_definitions() else {
        return String::new();
    };

    let mut html = String::from(
        "<table class=\"hovertable\" style=\"width: 100%;\">\n<tr><th>File name</th></tr>\n",
    );
    for file in files.iter().filter(|f| is_fixture_file(f)) {
        let _ = writeln!(html, "<tr><td>{}</td></tr>", escape_html(file));
    }
    html.push_str("</table>\n");
    html.push_str(
        "<br><a class=\"button button-blue\" \
         href=\"javascript:document.getElementById('loadTrigger').click();\">\n\
         <span>Load fixture</span></a>\n",
    );
    html
}

/// Configuration page: universes, audio devices and user fixtures.
///
/// The `System` button is only shown on embedded-class hosts.
pub fn config_page(
    io: &dyn IoPatchMap,
    audio: &dyn AudioSettings,
    fixtures: &dyn FixtureStore,
    ws_path: &str,
    embedded: bool,
) -> String {
    let js = format!("{}{}", assets::channel_js(ws_path), assets::CONFIG_JS);
    let css = format!(
        "{}{}{}{}",
        assets::DARK_PAGE_CSS,
        assets::HIDDEN_FORM_CSS,
        assets::COMMON_CSS,
        assets::TABLE_CSS
    );

    let mut body = String::from(
        "<form action=\"/loadFixture\" method=\"POST\" enctype=\"multipart/form-data\">\n\
         <input id=\"loadTrigger\" type=\"file\" \
         onchange=\"document.getElementById('submitTrigger').click();\" name=\"qlcfxi\" />\n\
         <input id=\"submitTrigger\" type=\"submit\"/></form>\n",
    );
    body.push_str("<div class=\"controlBar\">\n");
    body.push_str("<a class=\"button button-blue\" href=\"/\"><span>Back</span></a>\n");
    if embedded {
        body.push_str("<a class=\"button button-blue\" href=\"/system\"><span>System</span></a>\n");
    }
    body.push_str(&sw_info());
    body.push_str("</div>\n");

    let sections = [
        ("Universes configuration", io_table(io)),
        ("Audio configuration", audio_table(audio)),
        ("User loaded fixtures", fixtures_table(fixtures)),
    ];
    for (title, content) in sections {
        body.push_str("<div style=\"margin: 30px 7% 30px 7%; width: 86%;\" >\n");
        body.push_str(&section_title(title));
        body.push_str(&content);
        body.push_str("</div>\n");
    }

    document(&js, &css, &body)
}

/// System page: interface forms, autostart choice and reboot.
///
/// `interfaces` is `None` when the interfaces file could not be read.
pub fn system_page(interfaces: Option<&[InterfaceRecord]>, ws_path: &str) -> String {
    let js = format!("{}{}", assets::channel_js(ws_path), assets::SYSTEM_JS);
    let css = format!("{}{}", assets::DARK_PAGE_CSS, assets::COMMON_CSS);

    let mut body = String::from("<div class=\"controlBar\">\n");
    body.push_str("<a class=\"button button-blue\" href=\"/\"><span>Back</span></a>\n");
    body.push_str(&sw_info());
    body.push_str("</div>\n");

    body.push_str(&section_title("Network configuration"));
    for record in interfaces.unwrap_or_default() {
        body.push_str(&interface_form(record));
    }

    body.push_str(&section_title("Project autostart"));
    body.push_str(
        "<div style=\"margin: 15px 7% 0px 7%; width: 86%; font-family: verdana,arial,sans-serif;\
         font-size:18px; padding: 5px 0px; color:#CCCCCC; background:#222; border-radius: 7px;\">\n\
         <form style=\"margin: 5px 15px; color:#FFF;\">\n\
         <input type=\"radio\" name=\"autostart\" value=\"none\">No project\n\
         <input type=\"radio\" name=\"autostart\" value=\"current\" checked>Use current project\n\
         <input type=\"button\" value=\"Apply changes\" onclick=\"setAutostart();\" >\n\
         </form></div>\n",
    );

    body.push_str(
        "<div style=\"margin:5px 7%;\">\n\
         <a class=\"button button-blue\" href=\"javascript:websocket.send('QLC+SYS|REBOOT');\">\
         <span>Reboot</span></a>\n</div>\n",
    );

    document(&js, &css, &body)
}

/// Placeholder shown while the host loads an uploaded project.
///
/// Carries the channel script so the `URL|/` push after loading brings the
/// browser back to the console.
pub fn loading_page(ws_path: &str) -> String {
    format!(
        "<html><head>\n<meta http-equiv=\"content-type\" content=\"text/html; charset=utf-8\" />\n\
         <script type=\"text/javascript\">\n{}</script></head>\
         <body style=\"background-color: #45484d;\">\
         <div style=\"position: absolute; width: 100%; height: 30px; top: 50%; \
         background-color: #888888; text-align: center; font:bold 24px/1.2em sans-serif;\">\
         Loading project...</div></body></html>",
        assets::channel_js(ws_path)
    )
}

/// Reply to a stored fixture upload: alert, then back to `/config`
pub fn fixture_stored_page() -> String {
    "<html><head>\n<meta http-equiv=\"content-type\" content=\"text/html; charset=utf-8\" />\n\
     <script type=\"text/javascript\">\n\
     alert(\"Fixture stored and loaded\");\n\
     window.location = \"/config\";\n\
     </script></head></html>"
        .to_string()
}
