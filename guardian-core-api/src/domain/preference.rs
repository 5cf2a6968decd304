use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Notification class a guardian can opt in or out of, per student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PreferenceChannel {
    Sms,
    Email,
    Whatsapp,
    Portal,
    Calls,
}

impl PreferenceChannel {
    pub const ALL: [PreferenceChannel; 5] = [
        PreferenceChannel::Sms,
        PreferenceChannel::Email,
        PreferenceChannel::Whatsapp,
        PreferenceChannel::Portal,
        PreferenceChannel::Calls,
    ];

    /// Column holding this channel on the edge table.
    pub fn column_name(&self) -> &'static str {
        match self {
            PreferenceChannel::Sms => "receives_sms",
            PreferenceChannel::Email => "receives_email",
            PreferenceChannel::Whatsapp => "receives_whatsapp",
            PreferenceChannel::Portal => "receives_portal",
            PreferenceChannel::Calls => "receives_calls",
        }
    }
}

impl std::fmt::Display for PreferenceChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreferenceChannel::Sms => write!(f, "sms"),
            PreferenceChannel::Email => write!(f, "email"),
            PreferenceChannel::Whatsapp => write!(f, "whatsapp"),
            PreferenceChannel::Portal => write!(f, "portal"),
            PreferenceChannel::Calls => write!(f, "calls"),
        }
    }
}

impl FromStr for PreferenceChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sms" | "receives_sms" => Ok(PreferenceChannel::Sms),
            "email" | "receives_email" => Ok(PreferenceChannel::Email),
            "whatsapp" | "receives_whatsapp" => Ok(PreferenceChannel::Whatsapp),
            "portal" | "receives_portal" => Ok(PreferenceChannel::Portal),
            "calls" | "call" | "receives_calls" => Ok(PreferenceChannel::Calls),
            _ => Err(format!("Unknown preference channel: {s}")),
        }
    }
}

/// The five independent channel flags carried by every edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Preferences {
    pub sms: bool,
    pub email: bool,
    pub whatsapp: bool,
    pub portal: bool,
    pub calls: bool,
}

impl Default for Preferences {
    /// Policy applied to every new edge that does not state its own flags.
    fn default() -> Self {
        Self {
            sms: true,
            email: false,
            whatsapp: false,
            portal: true,
            calls: false,
        }
    }
}

impl Preferences {
    pub fn none() -> Self {
        Self {
            sms: false,
            email: false,
            whatsapp: false,
            portal: false,
            calls: false,
        }
    }

    pub fn get(&self, channel: PreferenceChannel) -> bool {
        match channel {
            PreferenceChannel::Sms => self.sms,
            PreferenceChannel::Email => self.email,
            PreferenceChannel::Whatsapp => self.whatsapp,
            PreferenceChannel::Portal => self.portal,
            PreferenceChannel::Calls => self.calls,
        }
    }

    pub fn set(&mut self, channel: PreferenceChannel, value: bool) {
        match channel {
            PreferenceChannel::Sms => self.sms = value,
            PreferenceChannel::Email => self.email = value,
            PreferenceChannel::Whatsapp => self.whatsapp = value,
            PreferenceChannel::Portal => self.portal = value,
            PreferenceChannel::Calls => self.calls = value,
        }
    }

    pub fn with(mut self, channel: PreferenceChannel, value: bool) -> Self {
        self.set(channel, value);
        self
    }

    pub fn enabled_channels(&self) -> Vec<PreferenceChannel> {
        PreferenceChannel::ALL
            .into_iter()
            .filter(|channel| self.get(*channel))
            .collect()
    }
}
