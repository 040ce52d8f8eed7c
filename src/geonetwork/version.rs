//! Supported GeoNetwork versions and their protocol descriptors
//!
//! Every supported server version maps to exactly one immutable [`GnInfo`]
//! descriptor carrying the protocol fragments that differ between versions.
//! The set is closed: supporting a new GeoNetwork release means adding an
//! enum variant and a descriptor here, never a configuration entry.

use super::error::{GnError, GnResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Health check endpoint, relative to the service URL.
///
/// `test.csw` answers 200 both to authenticated and anonymous sessions and
/// has no side effects.
pub const HEALTH_CHECK_PATH_TEMPLATE: &str = "/srv/{lang}/test.csw";

/// Placeholder replaced by the descriptor's language code
const LANG_PLACEHOLDER: &str = "{lang}";

/// Declared GeoNetwork server version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GnVersion {
    /// GeoNetwork 2.6.x
    V26,
    /// GeoNetwork 2.8.x
    V28,
    /// GeoNetwork 2.10.x
    V210,
    /// GeoNetwork 3.x
    V3,
}

impl GnVersion {
    /// All supported versions, oldest first
    pub fn all() -> [GnVersion; 4] {
        [GnVersion::V26, GnVersion::V28, GnVersion::V210, GnVersion::V3]
    }

    /// Canonical tag, as accepted by [`FromStr`]
    pub fn tag(&self) -> &'static str {
        match self {
            GnVersion::V26 => "V26",
            GnVersion::V28 => "V28",
            GnVersion::V210 => "V210",
            GnVersion::V3 => "V3",
        }
    }

    /// Descriptor for this version
    pub fn info(&self) -> &'static GnInfo {
        GnInfo::get(*self)
    }
}

impl fmt::Display for GnVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for GnVersion {
    type Err = GnError;

    /// Parse a version tag.
    ///
    /// Accepts the canonical tags (`V26`, `V28`, `V210`, `V3`) as well as
    /// dotted (`2.6`, `2.10`, `3.0`) and bare (`26`, `210`, `3`) spellings,
    /// case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "v26" | "2.6" | "26" => Ok(GnVersion::V26),
            "v28" | "2.8" | "28" => Ok(GnVersion::V28),
            "v210" | "2.10" | "210" => Ok(GnVersion::V210),
            "v3" | "3" | "3.0" | "3.x" => Ok(GnVersion::V3),
            _ => Err(GnError::UnsupportedVersion { tag: s.to_string() }),
        }
    }
}

/// Immutable per-version protocol descriptor
#[derive(Debug, PartialEq, Eq)]
pub struct GnInfo {
    version: GnVersion,
    lang: &'static str,
    health_check_path: &'static str,
}

static GN26: GnInfo = GnInfo {
    version: GnVersion::V26,
    lang: "en",
    health_check_path: HEALTH_CHECK_PATH_TEMPLATE,
};

static GN28: GnInfo = GnInfo {
    version: GnVersion::V28,
    lang: "eng",
    health_check_path: HEALTH_CHECK_PATH_TEMPLATE,
};

static GN210: GnInfo = GnInfo {
    version: GnVersion::V210,
    lang: "eng",
    health_check_path: HEALTH_CHECK_PATH_TEMPLATE,
};

static GN3: GnInfo = GnInfo {
    version: GnVersion::V3,
    lang: "eng",
    health_check_path: HEALTH_CHECK_PATH_TEMPLATE,
};

impl GnInfo {
    /// Descriptor for a known version. Total over [`GnVersion`].
    pub fn get(version: GnVersion) -> &'static GnInfo {
        match version {
            GnVersion::V26 => &GN26,
            GnVersion::V28 => &GN28,
            GnVersion::V210 => &GN210,
            GnVersion::V3 => &GN3,
        }
    }

    /// Descriptor for a version tag, failing on tags outside the known set
    pub fn resolve(tag: &str) -> GnResult<&'static GnInfo> {
        tag.parse::<GnVersion>().map(GnInfo::get)
    }

    pub fn version(&self) -> GnVersion {
        self.version
    }

    /// Language code used in service paths
    pub fn lang(&self) -> &'static str {
        self.lang
    }

    /// Unrendered health check path template
    pub fn health_check_path_template(&self) -> &'static str {
        self.health_check_path
    }

    /// Health check path with the language code filled in
    pub fn health_check_path(&self) -> String {
        self.health_check_path.replace(LANG_PLACEHOLDER, self.lang)
    }

    /// Path of a localized service, e.g. `/srv/eng/xml.search`
    pub fn service_path(&self, service: &str) -> String {
        format!("/srv/{}/{}", self.lang, service)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_version_has_a_descriptor() {
        for version in GnVersion::all() {
            let info = GnInfo::get(version);
            assert_eq!(info.version(), version);
            assert!(!info.lang().is_empty());
            assert!(!info.health_check_path_template().is_empty());
        }
    }

    #[test]
    fn test_language_codes() {
        assert_eq!(GnInfo::get(GnVersion::V26).lang(), "en");
        assert_eq!(GnInfo::get(GnVersion::V28).lang(), "eng");
        assert_eq!(GnInfo::get(GnVersion::V210).lang(), "eng");
        assert_eq!(GnInfo::get(GnVersion::V3).lang(), "eng");
    }

    #[test]
    fn test_health_check_path_rendering() {
        assert_eq!(
            GnInfo::get(GnVersion::V26).health_check_path(),
            "/srv/en/test.csw"
        );
        assert_eq!(
            GnInfo::get(GnVersion::V28).health_check_path(),
            "/srv/eng/test.csw"
        );
    }

    #[test]
    fn test_service_path() {
        assert_eq!(
            GnInfo::get(GnVersion::V210).service_path("xml.search"),
            "/srv/eng/xml.search"
        );
    }

    #[test]
    fn test_parse_tag_spellings() {
        assert_eq!("V26".parse::<GnVersion>().unwrap(), GnVersion::V26);
        assert_eq!("2.8".parse::<GnVersion>().unwrap(), GnVersion::V28);
        assert_eq!("v210".parse::<GnVersion>().unwrap(), GnVersion::V210);
        assert_eq!(" 3 ".parse::<GnVersion>().unwrap(), GnVersion::V3);
    }

    #[test]
    fn test_tag_round_trips_through_display() {
        for version in GnVersion::all() {
            assert_eq!(version.to_string().parse::<GnVersion>().unwrap(), version);
        }
    }

    #[test]
    fn test_unknown_tag_is_rejected() {
        match GnInfo::resolve("V4") {
            Err(GnError::UnsupportedVersion { tag }) => assert_eq!(tag, "V4"),
            other => panic!("Expected UnsupportedVersion, got {:?}", other),
        }
        assert!("".parse::<GnVersion>().is_err());
    }

    #[test]
    fn test_descriptors_are_shared() {
        let a = GnInfo::get(GnVersion::V28);
        let b = GnInfo::resolve("2.8").unwrap();
        assert!(std::ptr::eq(a, b));
    }
}
