use std::fmt;

/// The fixed set of OSC endpoints understood by the mod.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Endpoint {
    AvatarChange,
    AvatarParameter,
    /// `/avatar/parameters/<name>`, the VRChat-style parameter address.
    AvatarParametersLegacy,
    /// `/input/<name>`.
    Input,
    PropCreate,
    PropDelete,
    PropAvailable,
    PropParameter,
    PropLocation,
    PropLocationSub,
    TrackingDeviceStatus,
    TrackingDeviceData,
    TrackingPlaySpaceData,
    ConfigReset,
}

impl Endpoint {
    pub const ALL: [Endpoint; 14] = [
        Endpoint::AvatarChange,
        Endpoint::AvatarParameter,
        Endpoint::AvatarParametersLegacy,
        Endpoint::Input,
        Endpoint::PropCreate,
        Endpoint::PropDelete,
        Endpoint::PropAvailable,
        Endpoint::PropParameter,
        Endpoint::PropLocation,
        Endpoint::PropLocationSub,
        Endpoint::TrackingDeviceStatus,
        Endpoint::TrackingDeviceData,
        Endpoint::TrackingPlaySpaceData,
        Endpoint::ConfigReset,
    ];

    /// Full address for exact endpoints, address prefix for the prefix ones.
    pub const fn prefix(self) -> &'static str {
        match self {
            Endpoint::AvatarChange => "/avatar/change",
            Endpoint::AvatarParameter => "/avatar/parameter",
            Endpoint::AvatarParametersLegacy => "/avatar/parameters/",
            Endpoint::Input => "/input/",
            Endpoint::PropCreate => "/prop/create",
            Endpoint::PropDelete => "/prop/delete",
            Endpoint::PropAvailable => "/prop/available",
            Endpoint::PropParameter => "/prop/parameter",
            Endpoint::PropLocation => "/prop/location",
            Endpoint::PropLocationSub => "/prop/location_sub",
            Endpoint::TrackingDeviceStatus => "/tracking/device/status",
            Endpoint::TrackingDeviceData => "/tracking/device/data",
            Endpoint::TrackingPlaySpaceData => "/tracking/play_space/data",
            Endpoint::ConfigReset => "/config/reset",
        }
    }

    /// Whether the address carries a name after the prefix.
    pub const fn is_prefix(self) -> bool {
        matches!(self, Endpoint::AvatarParametersLegacy | Endpoint::Input)
    }

    /// Builds the address for `name` on a prefix endpoint.
    pub fn address_for(self, name: &str) -> String {
        format!("{}{}", self.prefix(), name)
    }

    pub fn from_address(addr: &str) -> Option<Endpoint> {
        Self::resolve(addr).map(|(endpoint, _)| endpoint)
    }

    /// Resolves an address to its endpoint and, for prefix endpoints, the
    /// non-empty name that follows the prefix.
    pub fn resolve(addr: &str) -> Option<(Endpoint, Option<&str>)> {
        for endpoint in Self::ALL {
            if endpoint.is_prefix() {
                if let Some(name) = addr.strip_prefix(endpoint.prefix()) {
                    if !name.is_empty() {
                        return Some((endpoint, Some(name)));
                    }
                }
            } else if addr == endpoint.prefix() {
                return Some((endpoint, None));
            }
        }
        None
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_prefix() {
            write!(f, "{}*", self.prefix())
        } else {
            f.write_str(self.prefix())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_addresses_resolve() {
        for endpoint in Endpoint::ALL.into_iter().filter(|e| !e.is_prefix()) {
            assert_eq!(Endpoint::from_address(endpoint.prefix()), Some(endpoint));
        }
    }

    #[test]
    fn prefix_addresses_carry_a_name() {
        assert_eq!(
            Endpoint::resolve("/avatar/parameters/MainColor-r"),
            Some((Endpoint::AvatarParametersLegacy, Some("MainColor-r")))
        );
        assert_eq!(
            Endpoint::resolve("/input/Jump"),
            Some((Endpoint::Input, Some("Jump")))
        );
        assert_eq!(Endpoint::from_address("/avatar/parameters/"), None);
        assert_eq!(Endpoint::from_address("/input/"), None);
    }

    #[test]
    fn parameter_and_parameters_are_distinct() {
        assert_eq!(
            Endpoint::from_address("/avatar/parameter"),
            Some(Endpoint::AvatarParameter)
        );
        assert_eq!(Endpoint::from_address("/avatar/parameterX"), None);
    }

    #[test]
    fn unknown_addresses() {
        for addr in ["", "/", "/chatbox/input", "/avatar/change/extra", "/prop"] {
            assert_eq!(Endpoint::from_address(addr), None, "{addr}");
        }
    }

    #[test]
    fn display_marks_prefix_endpoints() {
        assert_eq!(Endpoint::Input.to_string(), "/input/*");
        assert_eq!(Endpoint::PropDelete.to_string(), "/prop/delete");
    }
}
