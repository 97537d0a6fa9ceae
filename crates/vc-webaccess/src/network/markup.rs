//! Editable markup for interface records on the system page.

use crate::domain::interface::InterfaceRecord;
use crate::render::escape_html;

/// One form per interface: DHCP/static radio, static fields and an apply button.
///
/// Static fields start hidden for DHCP records.
pub fn interface_form(record: &InterfaceRecord) -> String {
    let name = escape_html(&record.name);
    let (dhcp_checked, static_checked, visibility) = if record.is_static {
        ("", "checked", "visible")
    } else {
        ("checked", "", "hidden")
    };

    let mut html = String::from("<div style=\"margin: 20px 7% 20px 7%; width: 86%;\" >\n");
    html.push_str(
        "<div style=\"font-family: verdana,arial,sans-serif; padding: 5px 7px; font-size:20px; \
         color:#CCCCCC; background:#222; border-radius: 7px;\">",
    );
    html.push_str(&format!("Network interface: {name}<br>\n"));

    html.push_str("<form style=\"margin: 5px 15px; color:#FFF;\">\n");
    html.push_str(&format!(
        "<input type=\"radio\" name=\"{name}NetGroup\" onclick=\"showStatic('{name}', false);\" \
         value=\"dhcp\" {dhcp_checked}>Dynamic (DHCP)<br>\n"
    ));
    html.push_str(&format!(
        "<input type=\"radio\" name=\"{name}NetGroup\" onclick=\"showStatic('{name}', true);\" \
         value=\"static\" {static_checked}>Static<br>\n"
    ));
    html.push_str(&format!(
        "<div id=\"{name}StaticFields\" style=\"padding: 5px 30px; visibility:{visibility};\">\n"
    ));
    html.push_str(&format!(
        "IP Address: <input type=\"text\" id=\"{name}IPaddr\" size=\"15\" value=\"{}\"><br>\n",
        escape_html(&record.address)
    ));
    html.push_str(&format!(
        "Netmask: <input type=\"text\" id=\"{name}Netmask\" size=\"15\" value=\"{}\"><br>\n",
        escape_html(&record.netmask)
    ));
    html.push_str(&format!(
        "Gateway: <input type=\"text\" id=\"{name}Gateway\" size=\"15\" value=\"{}\"><br>\n",
        escape_html(&record.gateway)
    ));
    html.push_str("</div>\n");
    html.push_str(&format!(
        "<input type=\"button\" value=\"Apply changes\" onclick=\"applyParams('{name}');\" >\n"
    ));
    html.push_str("</form></div></div>\n");
    html
}
