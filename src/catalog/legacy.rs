//! Legacy unit-id prefix table
//!
//! The first three buildings predate the `building_id` column: their units
//! are identified by a three-letter code (`CRC-501` lives in the CRC
//! Corporate Center). Featured homepage units use `FTR-` and belong to no
//! building page. New data should always carry an explicit `building_id`;
//! this table only resolves rows that don't.

/// Where a legacy prefix points
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyTarget {
    Building(&'static str),
    Home,
}

#[derive(Debug, Clone, Copy)]
pub struct LegacyPrefix {
    pub prefix: &'static str,
    pub target: LegacyTarget,
}

pub const LEGACY_PREFIXES: &[LegacyPrefix] = &[
    LegacyPrefix {
        prefix: "CTP-",
        target: LegacyTarget::Building("ctp-alpha-tower"),
    },
    LegacyPrefix {
        prefix: "CRC-",
        target: LegacyTarget::Building("crc-corporate-center"),
    },
    LegacyPrefix {
        prefix: "OPL-",
        target: LegacyTarget::Building("orchard-plaza"),
    },
    LegacyPrefix {
        prefix: "FTR-",
        target: LegacyTarget::Home,
    },
];

/// Look up the legacy target for a unit id
pub fn lookup(unit_id: &str) -> Option<LegacyTarget> {
    LEGACY_PREFIXES
        .iter()
        .find(|entry| unit_id.starts_with(entry.prefix))
        .map(|entry| entry.target)
}

/// Building id implied by a unit id prefix, if any
pub fn building_for_unit(unit_id: &str) -> Option<&'static str> {
    match lookup(unit_id)? {
        LegacyTarget::Building(id) => Some(id),
        LegacyTarget::Home => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        assert_eq!(
            lookup("CRC-501"),
            Some(LegacyTarget::Building("crc-corporate-center"))
        );
        assert_eq!(lookup("FTR-1"), Some(LegacyTarget::Home));
        assert_eq!(lookup("crc-501"), None);
        assert_eq!(lookup("NEW-1"), None);
    }

    #[test]
    fn test_featured_prefix_has_no_building() {
        assert_eq!(building_for_unit("FTR-7"), None);
        assert_eq!(building_for_unit("OPL-12"), Some("orchard-plaza"));
    }
}
