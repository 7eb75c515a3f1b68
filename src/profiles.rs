//! Static material profiles for drying-chamber targets.
//!
//! Maps the opaque material codes read from spool tags to a display
//! name and a target chamber temperature.

/// Materials as encoded on spool tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Pla,
    Pva,
    PetG,
    Nylon,
    Abs,
    Tpu,
    Default,
}

pub struct MaterialProfile {
    pub name: &'static str,
    /// Target chamber temperature while drying, in degrees C.
    pub target_temp_c: f32,
}

/// Decode a raw tag code into a material. Unknown codes map to the
/// default profile.
pub fn material_from_code(code: u32) -> Material {
    match code {
        3_508_469 => Material::Pla,
        77_811_945 => Material::Pva,
        944_651 => Material::PetG,
        11_545_581 => Material::Nylon,
        1_420_656 => Material::Abs,
        35_468 => Material::Tpu,
        _ => Material::Default,
    }
}

pub fn profile(material: Material) -> &'static MaterialProfile {
    match material {
        Material::Pla => &MaterialProfile {
            name: "PLA",
            target_temp_c: 45.0,
        },
        Material::Pva => &MaterialProfile {
            name: "PVA",
            target_temp_c: 45.0,
        },
        Material::PetG => &MaterialProfile {
            name: "PET-G",
            target_temp_c: 60.0,
        },
        Material::Nylon => &MaterialProfile {
            name: "Nylon",
            target_temp_c: 70.0,
        },
        Material::Abs => &MaterialProfile {
            name: "ABS",
            target_temp_c: 60.0,
        },
        Material::Tpu => &MaterialProfile {
            name: "TPU",
            target_temp_c: 50.0,
        },
        Material::Default => &MaterialProfile {
            name: "unknown",
            target_temp_c: 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_resolve() {
        assert_eq!(material_from_code(3_508_469), Material::Pla);
        assert_eq!(profile(Material::Pla).name, "PLA");
        assert_eq!(profile(Material::Nylon).target_temp_c, 70.0);
    }

    #[test]
    fn unknown_codes_fall_back_to_default() {
        let material = material_from_code(0xDEAD_BEEF);
        assert_eq!(material, Material::Default);
        assert_eq!(profile(material).target_temp_c, 0.0);
    }
}
