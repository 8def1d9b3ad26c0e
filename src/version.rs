//! Version identifiers used to gate Schema Registry lookups.
//!
//! Versions form a total order per spec: `1.0 < 1.1 < 2.0 < 3.0 < 3.1` for DOCSIS and
//! `1.0 < 1.5 < 2.0` for PacketCable. A TLV introduced in version `v` is valid for any
//! query version `v' >= v`.

use std::fmt;

/// A DOCSIS specification version.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DocsisVersion {
    V1_0,
    V1_1,
    V2_0,
    V3_0,
    V3_1,
}

impl DocsisVersion {
    pub const ALL: [DocsisVersion; 5] = [
        DocsisVersion::V1_0,
        DocsisVersion::V1_1,
        DocsisVersion::V2_0,
        DocsisVersion::V3_0,
        DocsisVersion::V3_1,
    ];

    pub const LATEST: DocsisVersion = DocsisVersion::V3_1;
}

impl fmt::Display for DocsisVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocsisVersion::V1_0 => "1.0",
            DocsisVersion::V1_1 => "1.1",
            DocsisVersion::V2_0 => "2.0",
            DocsisVersion::V3_0 => "3.0",
            DocsisVersion::V3_1 => "3.1",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for DocsisVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(DocsisVersion::V1_0),
            "1.1" => Ok(DocsisVersion::V1_1),
            "2.0" => Ok(DocsisVersion::V2_0),
            "3.0" => Ok(DocsisVersion::V3_0),
            "3.1" => Ok(DocsisVersion::V3_1),
            other => Err(format!("unknown DOCSIS version: {other}")),
        }
    }
}

impl Default for DocsisVersion {
    fn default() -> Self {
        DocsisVersion::LATEST
    }
}

/// A PacketCable MTA specification version.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PacketCableVersion {
    V1_0,
    V1_5,
    V2_0,
}

impl PacketCableVersion {
    pub const ALL: [PacketCableVersion; 3] = [
        PacketCableVersion::V1_0,
        PacketCableVersion::V1_5,
        PacketCableVersion::V2_0,
    ];

    pub const LATEST: PacketCableVersion = PacketCableVersion::V2_0;
}

impl fmt::Display for PacketCableVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PacketCableVersion::V1_0 => "1.0",
            PacketCableVersion::V1_5 => "1.5",
            PacketCableVersion::V2_0 => "2.0",
        };
        f.write_str(s)
    }
}

impl std::str::FromStr for PacketCableVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1.0" => Ok(PacketCableVersion::V1_0),
            "1.5" => Ok(PacketCableVersion::V1_5),
            "2.0" => Ok(PacketCableVersion::V2_0),
            other => Err(format!("unknown PacketCable version: {other}")),
        }
    }
}

impl Default for PacketCableVersion {
    fn default() -> Self {
        PacketCableVersion::LATEST
    }
}

impl serde::Serialize for DocsisVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for DocsisVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl serde::Serialize for PacketCableVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for PacketCableVersion {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docsis_versions_are_totally_ordered() {
        assert!(DocsisVersion::V1_0 < DocsisVersion::V1_1);
        assert!(DocsisVersion::V1_1 < DocsisVersion::V2_0);
        assert!(DocsisVersion::V2_0 < DocsisVersion::V3_0);
        assert!(DocsisVersion::V3_0 < DocsisVersion::V3_1);
    }

    #[test]
    fn packetcable_versions_are_totally_ordered() {
        assert!(PacketCableVersion::V1_0 < PacketCableVersion::V1_5);
        assert!(PacketCableVersion::V1_5 < PacketCableVersion::V2_0);
    }

    #[test]
    fn roundtrips_through_display_and_fromstr() {
        for v in DocsisVersion::ALL {
            assert_eq!(v.to_string().parse::<DocsisVersion>().unwrap(), v);
        }
        for v in PacketCableVersion::ALL {
            assert_eq!(v.to_string().parse::<PacketCableVersion>().unwrap(), v);
        }
    }
}
