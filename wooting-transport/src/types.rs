//! Common types for the transport layer

use serde::{Deserialize, Serialize};

/// Mask applied to product ids before comparison.
///
/// Hardware revisions of one model differ only in the low nibble.
pub const PRODUCT_ID_MASK: u16 = 0xFFF0;

/// Clear the revision nibble of a product id
#[inline]
pub fn masked_product_id(pid: u16) -> u16 {
    pid & PRODUCT_ID_MASK
}

/// Identification of one HID interface as reported by the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HidDescriptor {
    /// USB Vendor ID
    pub vendor_id: u16,
    /// USB Product ID (unmasked)
    pub product_id: u16,
    /// Product name if available
    pub product_name: Option<String>,
    /// Usage pages of the top-level collections this interface declares
    pub usage_pages: Vec<u16>,
    /// Device path or identifier (transport-specific)
    pub path: String,
}

impl HidDescriptor {
    /// Product id with the revision nibble cleared
    pub fn masked_product_id(&self) -> u16 {
        masked_product_id(self.product_id)
    }

    /// Check whether the interface declares a collection on `usage_page`
    pub fn has_usage_page(&self, usage_page: u16) -> bool {
        self.usage_pages.contains(&usage_page)
    }

    /// Short identity string for logs and listings
    pub fn debug_string(&self) -> String {
        format!(
            "'{}' vid: {:x} pid: {:x}",
            self.product_name.as_deref().unwrap_or(""),
            self.vendor_id,
            self.product_id
        )
    }
}

/// Declarative device filter
///
/// Every field that is set must match. An all-`None` filter matches any
/// device and should never be shipped as part of a capability's rule set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFilter {
    /// Exact vendor id
    pub vendor_id: Option<u16>,
    /// Product id, compared after masking with [`PRODUCT_ID_MASK`]
    pub product_id: Option<u16>,
    /// Usage page that must appear among the declared collections
    pub usage_page: Option<u16>,
}

impl DeviceFilter {
    /// Filter on vendor id and usage page, any product
    pub const fn vendor_usage_page(vendor_id: u16, usage_page: u16) -> Self {
        Self {
            vendor_id: Some(vendor_id),
            product_id: None,
            usage_page: Some(usage_page),
        }
    }

    /// True if no field is set
    pub fn is_empty(&self) -> bool {
        self.vendor_id.is_none() && self.product_id.is_none() && self.usage_page.is_none()
    }

    /// Quick yes/no check used by backends when pre-selecting devices.
    pub fn admits(&self, descriptor: &HidDescriptor) -> bool {
        self.vendor_id.is_none_or(|v| descriptor.vendor_id == v)
            && self
                .product_id
                .is_none_or(|p| descriptor.masked_product_id() == p)
            && self
                .usage_page
                .is_none_or(|up| descriptor.has_usage_page(up))
    }
}
