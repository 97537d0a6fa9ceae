//! Network interface records edited from the system page.

use serde::{Deserialize, Serialize};

/// Addressing method of an interface stanza.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressMode {
    Dhcp,
    Static {
        address: String,
        netmask: String,
        gateway: String,
    },
}

impl AddressMode {
    pub fn is_static(&self) -> bool {
        matches!(self, AddressMode::Static { .. })
    }

    /// A static mode is writable only with every field filled in
    pub fn is_complete(&self) -> bool {
        match self {
            AddressMode::Dhcp => true,
            AddressMode::Static {
                address,
                netmask,
                gateway,
            } => !address.is_empty() && !netmask.is_empty() && !gateway.is_empty(),
        }
    }
}

/// One `iface` stanza of the interfaces file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceRecord {
    pub name: String,
    pub is_static: bool,
    pub address: String,
    pub netmask: String,
    pub gateway: String,
}

impl InterfaceRecord {
    pub fn dhcp(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_static: false,
            address: String::new(),
            netmask: String::new(),
            gateway: String::new(),
        }
    }

    pub fn with_static(
        name: impl Into<String>,
        address: impl Into<String>,
        netmask: impl Into<String>,
        gateway: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            is_static: true,
            address: address.into(),
            netmask: netmask.into(),
            gateway: gateway.into(),
        }
    }

    pub fn mode(&self) -> AddressMode {
        if self.is_static {
            AddressMode::Static {
                address: self.address.clone(),
                netmask: self.netmask.clone(),
                gateway: self.gateway.clone(),
            }
        } else {
            AddressMode::Dhcp
        }
    }

    /// Replace addressing. DHCP clears the address fields.
    pub fn apply(&mut self, mode: AddressMode) {
        match mode {
            AddressMode::Dhcp => {
                self.is_static = false;
                self.address.clear();
                self.netmask.clear();
                self.gateway.clear();
            }
            AddressMode::Static {
                address,
                netmask,
                gateway,
            } => {
                self.is_static = true;
                self.address = address;
                self.netmask = netmask;
                self.gateway = gateway;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_modes() {
        let mut rec = InterfaceRecord::dhcp("eth0");
        rec.apply(AddressMode::Static {
            address: "10.0.0.5".into(),
            netmask: "255.255.255.0".into(),
            gateway: "10.0.0.1".into(),
        });
        assert!(rec.is_static);
        assert!(rec.mode().is_complete());

        rec.apply(AddressMode::Dhcp);
        assert_eq!(rec, InterfaceRecord::dhcp("eth0"));
    }

    #[test]
    fn test_incomplete_static() {
        let mode = AddressMode::Static {
            address: "10.0.0.5".into(),
            netmask: String::new(),
            gateway: "10.0.0.1".into(),
        };
        assert!(!mode.is_complete());
        assert!(AddressMode::Dhcp.is_complete());
    }
}
