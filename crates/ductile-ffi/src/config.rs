//! C mirror of the creation-time configuration.

use ductile_core::SeqConfig;

use crate::status::DuctileStatus;

/// Creation parameters for `ductile_vector_create`.
///
/// A `capacity` of 0 selects the default; any other value below the
/// minimum is raised to it.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DuctileConfig {
    /// Byte width of every element. Must be non-zero.
    pub element_size: usize,
    /// Initial slot count.
    pub capacity: usize,
}

impl From<DuctileConfig> for SeqConfig {
    fn from(c: DuctileConfig) -> Self {
        SeqConfig::new(c.element_size).with_capacity(c.capacity)
    }
}

impl From<SeqConfig> for DuctileConfig {
    fn from(c: SeqConfig) -> Self {
        Self {
            element_size: c.element_size,
            capacity: c.capacity,
        }
    }
}

/// Fill `config_out` with defaults for elements of `element_size` bytes.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn ductile_config_init(config_out: *mut DuctileConfig, element_size: usize) -> i32 {
    ffi_guard!({
        if config_out.is_null() {
            return DuctileStatus::InvalidArgument as i32;
        }
        let config = DuctileConfig::from(SeqConfig::new(element_size));
        // SAFETY: config_out is valid per caller contract.
        unsafe { *config_out = config };
        DuctileStatus::Ok as i32
    })
}
