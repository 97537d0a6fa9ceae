//! Static CSS and JS fragments.
//!
//! Per-kind fragments are emitted at most once per page through the
//! [`AssetLedger`](super::AssetLedger); the page-level ones are part of every
//! shell.

use crate::domain::widget::KindTag;

/// Placeholder replaced by the channel endpoint path
const WS_PATH_PLACEHOLDER: &str = "__WS_PATH__";

const CHANNEL_JS: &str = r#"var websocket;
window.onload = function() {
 var url = 'ws://' + window.location.host + '__WS_PATH__';
 websocket = new WebSocket(url);
 websocket.onopen = function(ev) {
  setInterval(function() { websocket.send("POLL"); }, 15000);
 };
 websocket.onclose = function(ev) {
  alert("Connection lost !");
 };
 websocket.onerror = function(ev) {
  alert("Connection error !");
 };
 websocket.onmessage = function(ev) {
  var msgParams = ev.data.split('|');
  if (msgParams[0] == "URL") {
   window.location = msgParams[1];
  }
  else if (msgParams[0] == "ALERT") {
   alert(msgParams[1]);
  }
  else if (msgParams[1] == "BUTTON") {
   var obj = document.getElementById(msgParams[0]);
   if (obj) {
    obj.style.border = (msgParams[2] == "1") ? "3px solid #00E600" : "3px solid #A0A0A0";
   }
  }
  else if (msgParams[1] == "SLIDER") {
   var slObj = document.getElementById(msgParams[0]);
   if (slObj) { slObj.value = msgParams[2]; }
   var labelObj = document.getElementById("slv" + msgParams[0]);
   if (labelObj) { labelObj.innerHTML = msgParams[2]; }
  }
  else if (msgParams[1] == "CUE") {
   if (typeof setCueIndex === 'function') {
    setCueIndex(msgParams[0], parseInt(msgParams[2]));
   }
  }
 };
};
"#;

const BUTTON_JS: &str = r#"function buttonClick(id) {
 websocket.send(id);
}
"#;

const SLIDER_JS: &str = r#"function slVchange(id) {
 var slObj = document.getElementById(id);
 var labelObj = document.getElementById("slv" + id);
 labelObj.innerHTML = slObj.value;
 websocket.send(id + "|" + slObj.value);
}
"#;

const AUDIO_TRIGGERS_JS: &str = r#"var atEnabled = {};
function atButtonClick(id) {
 var obj = document.getElementById(id);
 var on = !atEnabled[id];
 atEnabled[id] = on;
 obj.style.border = on ? "3px solid #00E600" : "3px solid #A0A0A0";
 websocket.send(id + "|" + (on ? 255 : 0));
}
"#;

const CUE_LIST_JS: &str = r#"var cueSelected = {};
function sendCueCmd(id, cmd) {
 websocket.send(id + "|" + cmd);
}
function setCueIndex(id, idx) {
 var old = cueSelected[id];
 if (old !== undefined && old >= 0) {
  var oldRow = document.getElementById(id + "_" + old);
  if (oldRow) { oldRow.style.backgroundColor = ''; }
 }
 cueSelected[id] = idx;
 if (idx >= 0) {
  var row = document.getElementById(id + "_" + idx);
  if (row) { row.style.backgroundColor = '#5E7FDF'; }
 }
 var playObj = document.getElementById("play" + id);
 if (playObj) { playObj.innerHTML = (idx >= 0) ? "Stop" : "Play"; }
}
function enableCue(id, idx) {
 setCueIndex(id, idx);
 websocket.send(id + "|STEP|" + idx);
}
function checkMouseOut(id, idx) {
 var row = document.getElementById(id + "_" + idx);
 if (!row) { return; }
 row.style.backgroundColor = (cueSelected[id] == idx) ? '#5E7FDF' : '';
}
"#;

/// `ioChanged` for the configuration page
pub const CONFIG_JS: &str = r#"function ioChanged(cmd, uni, val) {
 websocket.send("QLC+IO|" + cmd + "|" + uni + "|" + val);
}
"#;

/// Network, autostart and reboot helpers for the system page
pub const SYSTEM_JS: &str = r#"function systemCmd(cmd, iface, mode, addr, mask, gw) {
 websocket.send("QLC+SYS|" + cmd + "|" + iface + "|" + mode + "|" + addr + "|" + mask + "|" + gw);
}
function showStatic(iface, enable) {
 var obj = document.getElementById(iface + "StaticFields");
 obj.style.visibility = enable ? 'visible' : 'hidden';
}
function applyParams(iface) {
 var radios = document.getElementsByName(iface + "NetGroup");
 if (radios[0].checked) {
  systemCmd("NETWORK", iface, "dhcp", '', '', '');
 }
 else if (radios[1].checked) {
  systemCmd("NETWORK", iface, "static",
   document.getElementById(iface + "IPaddr").value,
   document.getElementById(iface + "Netmask").value,
   document.getElementById(iface + "Gateway").value);
 }
}
function setAutostart() {
 var radios = document.getElementsByName('autostart');
 if (radios[0].checked)
  websocket.send('QLC+SYS|AUTOSTART|none');
 else
  websocket.send('QLC+SYS|AUTOSTART|current');
}
"#;

const GENERIC_CSS: &str = r#".vcwidget {
 position: absolute;
 border: 1px solid #777777;
 border-radius: 3px;
 font: 12px sans-serif;
 text-align: center;
}
"#;

const FRAME_CSS: &str = r#".vcframe {
 position: absolute;
}
.vcframeHeader {
 background: linear-gradient(to bottom, #666666 0%, #000000 100%);
 border-radius: 3px;
 height: 32px;
 margin: 2px;
 padding: 0 0 0 3px;
 font: bold 16px/32px sans-serif;
}
"#;

const SOLO_FRAME_CSS: &str = r#".vcsoloframe {
 position: absolute;
}
.vcsoloframeHeader {
 background: linear-gradient(to bottom, #BC0A0A 0%, #370303 100%);
 border-radius: 3px;
 height: 32px;
 margin: 2px;
 padding: 0 0 0 3px;
 font: bold 16px/32px sans-serif;
}
"#;

const BUTTON_CSS: &str = r#".vcbutton-wrapper {
 position: absolute;
}
.vcbutton {
 display: table-cell;
 border: 3px solid #A0A0A0;
 border-radius: 4px;
 font: bold 12px sans-serif;
 text-align: center;
 vertical-align: middle;
 text-decoration: none;
}
"#;

const SLIDER_CSS: &str = r#".vcslider {
 position: absolute;
 border: 1px solid #777777;
 border-radius: 3px;
}
.vcslLabel {
 position: absolute;
 width: 100%;
 height: 20px;
 font: 12px sans-serif;
 text-align: center;
}
input.vVertical {
 -webkit-appearance: none;
 height: 20px;
 background-color: #888888;
 transform: rotate(270deg);
 transform-origin: 0% 0%;
}
"#;

const LABEL_CSS: &str = r#".vclabel-wrapper {
 position: absolute;
}
.vclabel {
 display: table-cell;
 border-radius: 3px;
 font: 12px sans-serif;
 vertical-align: middle;
}
"#;

const AUDIO_TRIGGERS_CSS: &str = r#".vcaudiotriggers {
 position: absolute;
 border: 1px solid #777777;
 border-radius: 4px;
}
.vcaudioHeader {
 background: linear-gradient(to bottom, #345D27 0%, #0E1A0A 100%);
 border-radius: 3px;
 height: 32px;
 margin: 2px;
 padding: 0 0 0 3px;
 font: bold 16px/32px sans-serif;
}
.vcatbutton-wrapper {
 position: absolute;
}
.vcatbutton {
 display: table-cell;
 border: 3px solid #A0A0A0;
 border-radius: 4px;
 background-color: #D7DE75;
 color: #000;
 font: bold 16px sans-serif;
 text-align: center;
 vertical-align: middle;
 text-decoration: none;
}
"#;

const CUE_LIST_CSS: &str = r#".vccuelist {
 position: absolute;
 border: 1px solid #777777;
 border-radius: 3px;
}
"#;

/// Shared by every page
pub const COMMON_CSS: &str = r#".controlBar {
 width: 100%;
 height: 40px;
 background: linear-gradient(to bottom, #B2D360 0%, #4B9002 100%);
 font: bold 24px/1.2em sans-serif;
 color: #ffffff;
}
.button {
 height: 36px;
 margin-left: 5px;
 text-decoration: none;
 font: bold 20px/1.2em sans-serif;
 position: relative;
 text-align: center;
 display: inline-block;
 border-radius: 6px;
}
.button span {
 display: block;
 line-height: 36px;
 padding: 0 12px;
}
.button:hover {
 opacity: .85;
}
.button:active {
 box-shadow: inset 0 0 4px #000;
}
.button-blue {
 border: 1px solid #0C4569;
 background: linear-gradient(to bottom, #4E98D8 0%, #1F5F96 100%);
 color: #ffffff;
}
.swInfo {
 position: absolute;
 right: 5px;
 top: 8px;
 font-size: 16px;
 color: #ffffff;
}
"#;

/// Hidden upload form on pages that accept files
pub const HIDDEN_FORM_CSS: &str = r#"form {
 position: absolute;
 visibility: hidden;
}
"#;

/// Tables on the configuration page and in cue lists
pub const TABLE_CSS: &str = r#"table.hovertable {
 font-family: verdana,arial,sans-serif;
 font-size: 11px;
 color: #333333;
 border-width: 1px;
 border-color: #999999;
 border-collapse: collapse;
}
table.hovertable th {
 background-color: #DCD9D6;
 border-width: 1px;
 padding: 3px;
 border-style: solid;
 border-color: #a9c6c9;
 text-align: left;
}
table.hovertable tr {
 background-color: #ffffff;
}
table.hovertable td {
 border-width: 1px;
 padding: 3px;
 border-style: solid;
 border-color: #a9c6c9;
}
"#;

/// Gradient background of the configuration and system pages
pub const DARK_PAGE_CSS: &str = r#"html { height: 100%; background-color: #111; }
body {
 margin: 0px;
 background-image: linear-gradient(to bottom, #45484d 0%, #111 100%);
}
"#;

/// One-time CSS for a widget kind
pub fn css_for(tag: KindTag) -> &'static str {
    match tag {
        KindTag::Frame => FRAME_CSS,
        KindTag::SoloFrame => SOLO_FRAME_CSS,
        KindTag::Button => BUTTON_CSS,
        KindTag::Slider => SLIDER_CSS,
        KindTag::Label => LABEL_CSS,
        KindTag::AudioTriggers => AUDIO_TRIGGERS_CSS,
        KindTag::CueList => CUE_LIST_CSS,
        KindTag::Generic => GENERIC_CSS,
    }
}

/// One-time JS for a widget kind; empty for passive kinds
pub fn js_for(tag: KindTag) -> &'static str {
    match tag {
        KindTag::Button => BUTTON_JS,
        KindTag::Slider => SLIDER_JS,
        KindTag::AudioTriggers => AUDIO_TRIGGERS_JS,
        KindTag::CueList => CUE_LIST_JS,
        KindTag::Frame | KindTag::SoloFrame | KindTag::Label | KindTag::Generic => "",
    }
}

/// Channel bootstrap script connecting to `ws_path`
pub fn channel_js(ws_path: &str) -> String {
    CHANNEL_JS.replace(WS_PATH_PLACEHOLDER, ws_path)
}
