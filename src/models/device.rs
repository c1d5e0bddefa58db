// Fixed lab inventory

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseDeviceError;

/// One monitored VM in the lab. The set is compiled in; there is no runtime registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Device {
    #[serde(rename = "pfsense")]
    Pfsense,
    #[serde(rename = "dc01")]
    Dc01,
    #[serde(rename = "UbuWebServ")]
    UbuWebServ,
    #[serde(rename = "WinWork")]
    WinWork,
    #[serde(rename = "Kali")]
    Kali,
}

/// Static description of a device, shown next to its live metrics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInventory {
    pub role: &'static str,
    pub function: &'static str,
    pub ip: &'static str,
}

impl Device {
    /// Every device, in dashboard order.
    pub const ALL: [Device; 5] = [
        Device::Pfsense,
        Device::Dc01,
        Device::UbuWebServ,
        Device::WinWork,
        Device::Kali,
    ];

    /// Name used in the status endpoint path.
    pub fn name(self) -> &'static str {
        match self {
            Device::Pfsense => "pfsense",
            Device::Dc01 => "dc01",
            Device::UbuWebServ => "UbuWebServ",
            Device::WinWork => "WinWork",
            Device::Kali => "Kali",
        }
    }

    pub fn inventory(self) -> DeviceInventory {
        match self {
            Device::Pfsense => DeviceInventory {
                role: "Firewall/Router",
                function: "Network security and routing",
                ip: "192.168.0.1",
            },
            Device::Dc01 => DeviceInventory {
                role: "Domain Controller",
                function: "Active Directory services",
                ip: "192.168.0.10",
            },
            Device::UbuWebServ => DeviceInventory {
                role: "Web Server",
                function: "Web applications and services",
                ip: "192.168.0.20",
            },
            Device::WinWork => DeviceInventory {
                role: "Windows Workstation",
                function: "Client testing and administration",
                ip: "192.168.0.30",
            },
            Device::Kali => DeviceInventory {
                role: "Security Testing",
                function: "Penetration testing and assessment",
                ip: "192.168.0.40",
            },
        }
    }
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Device {
    type Err = ParseDeviceError;

    /// Exact, case-sensitive match on the endpoint name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Device::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| ParseDeviceError(s.to_string()))
    }
}
