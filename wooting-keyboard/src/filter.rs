//! Capability classification of HID descriptors
//!
//! A descriptor is claimed by a capability if it matches one of that
//! capability's [`DeviceFilter`] rules. When nothing matches, the mismatch
//! carries one reason per failing field of every rule tried, so a caller can
//! tell why a device was rejected.

use std::fmt;

use wooting_transport::{DeviceFilter, HidDescriptor};

/// Why a descriptor did not match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterMismatch {
    pub reasons: Vec<String>,
}

impl fmt::Display for FilterMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.reasons.join("; "))
    }
}

impl std::error::Error for FilterMismatch {}

/// Check one rule against a descriptor
pub fn filter_match<'f>(
    dev: &HidDescriptor,
    filter: &'f DeviceFilter,
) -> Result<&'f DeviceFilter, FilterMismatch> {
    let mut reasons = Vec::new();

    if let Some(vid) = filter.vendor_id {
        if dev.vendor_id != vid {
            reasons.push(format!(
                "Vendor id mismatch: {:#06x}. Expected: {:#06x}",
                dev.vendor_id, vid
            ));
        }
    }

    if let Some(pid) = filter.product_id {
        let masked = dev.masked_product_id();
        if masked != pid {
            reasons.push(format!(
                "Product id mismatch: {:#06x}. Expected: {:#06x}",
                masked, pid
            ));
        }
    }

    if let Some(page) = filter.usage_page {
        if !dev.has_usage_page(page) {
            let pages: Vec<String> = dev
                .usage_pages
                .iter()
                .map(|p| format!("{p:#06x}"))
                .collect();
            reasons.push(format!(
                "Usage page mismatch: [{}]. Expected: {:#06x}",
                pages.join(","),
                page
            ));
        }
    }

    if reasons.is_empty() {
        Ok(filter)
    } else {
        Err(FilterMismatch { reasons })
    }
}

/// First rule that matches, or every reason from every rule
pub fn match_any<'f>(
    dev: &HidDescriptor,
    filters: &'f [DeviceFilter],
) -> Result<&'f DeviceFilter, FilterMismatch> {
    let mut mismatch = FilterMismatch::default();
    for filter in filters {
        match filter_match(dev, filter) {
            Ok(matched) => return Ok(matched),
            Err(e) => mismatch.reasons.extend(e.reasons),
        }
    }
    Err(mismatch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(vid: u16, pid: u16, pages: &[u16]) -> HidDescriptor {
        HidDescriptor {
            vendor_id: vid,
            product_id: pid,
            product_name: Some("Test".into()),
            usage_pages: pages.to_vec(),
            path: "test".into(),
        }
    }

    const RULES: &[DeviceFilter] = &[
        DeviceFilter::vendor_usage_page(0x31E3, 0x1337),
        DeviceFilter::vendor_usage_page(0x31E3, 0xFF54),
    ];

    #[test]
    fn test_first_match_wins() {
        let dev = descriptor(0x31E3, 0x1302, &[0xFF54, 0x1337]);
        assert_eq!(match_any(&dev, RULES).unwrap(), &RULES[0]);

        let analog_only = descriptor(0x31E3, 0x1302, &[0xFF54]);
        assert_eq!(match_any(&analog_only, RULES).unwrap(), &RULES[1]);
    }

    #[test]
    fn test_vendor_mismatch_reason_per_rule() {
        let dev = descriptor(0x3151, 0x5030, &[0x1337, 0xFF54]);
        let err = match_any(&dev, RULES).unwrap_err();
        assert_eq!(err.reasons.len(), RULES.len());
        assert!(err.reasons.iter().all(|r| r.starts_with("Vendor id mismatch")));
    }

    #[test]
    fn test_reasons_accumulate_per_field() {
        let rule = DeviceFilter {
            vendor_id: Some(0x31E3),
            product_id: Some(0x1300),
            usage_page: Some(0x1337),
        };
        let err = filter_match(&descriptor(0x0001, 0x1400, &[0x0001]), &rule).unwrap_err();
        assert_eq!(err.reasons.len(), 3);
        assert!(err.reasons[0].starts_with("Vendor id"));
        assert!(err.reasons[1].starts_with("Product id"));
        assert!(err.reasons[2].starts_with("Usage page"));
    }

    #[test]
    fn test_product_id_is_masked() {
        let rule = DeviceFilter {
            vendor_id: Some(0x31E3),
            product_id: Some(0x1300),
            usage_page: None,
        };
        assert!(filter_match(&descriptor(0x31E3, 0x130F, &[]), &rule).is_ok());
        assert!(filter_match(&descriptor(0x31E3, 0x1310, &[]), &rule).is_err());
    }

    #[test]
    fn test_no_rules_no_match() {
        let err = match_any(&descriptor(0x31E3, 0x1300, &[0x1337]), &[]).unwrap_err();
        assert!(err.reasons.is_empty());
    }
}
