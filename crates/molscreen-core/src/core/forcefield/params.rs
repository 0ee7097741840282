use crate::core::models::element::Element;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;

/// Per-element parameters of a force field.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ElementParam {
    /// Bonding radius in Angstroms; a bond's rest length starts from the sum of both radii.
    pub bond_radius: f64,
    /// Van der Waals minimum-energy distance in Angstroms.
    pub vdw_radius: f64,
    /// Van der Waals well depth in kcal/mol.
    pub well_depth: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct GlobalParams {
    /// Stretching constant in kcal/(mol·Å²), multiplied by the bond multiplicity.
    pub bond_force_constant: f64,
    /// Bending constant in kcal/(mol·rad²).
    pub angle_force_constant: f64,
    /// Rest-length shortening per unit of `ln(bond order)`, as a fraction of the radius sum.
    pub bond_order_correction: f64,
    pub dielectric_constant: f64,
    /// Scale applied to van der Waals and Coulomb terms between 1-4 atom pairs.
    pub scale_14: f64,
}

/// A named parameter set for the built-in force field.
///
/// With `universal = true` elements missing from `elements` fall back to the radii and
/// van der Waals data of the element table, so every element is covered. Otherwise an
/// element without an entry makes the whole molecule unsupported.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ForcefieldParams {
    pub name: String,
    pub globals: GlobalParams,
    #[serde(default)]
    pub universal: bool,
    #[serde(default)]
    pub elements: HashMap<String, ElementParam>,
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Unknown element '{symbol}' in parameter file '{path}'")]
    UnknownElement { path: String, symbol: String },
}

impl ForcefieldParams {
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let params: Self = toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        if let Some(symbol) = params
            .elements
            .keys()
            .find(|symbol| symbol.parse::<Element>().is_err())
        {
            return Err(ParamLoadError::UnknownElement {
                path: path.to_string_lossy().to_string(),
                symbol: symbol.clone(),
            });
        }
        Ok(params)
    }

    /// Element-typed parameters for the common organic elements. Precise but narrow.
    pub fn typed() -> Self {
        let table: [(Element, f64, f64, f64); 11] = [
            (Element::H, 0.32, 2.40, 0.020),
            (Element::C, 0.77, 3.80, 0.070),
            (Element::N, 0.72, 3.60, 0.080),
            (Element::O, 0.69, 3.30, 0.100),
            (Element::F, 0.64, 3.10, 0.075),
            (Element::Si, 1.15, 4.30, 0.400),
            (Element::P, 1.09, 4.20, 0.300),
            (Element::S, 1.05, 4.00, 0.250),
            (Element::Cl, 1.00, 3.90, 0.280),
            (Element::Br, 1.15, 4.10, 0.350),
            (Element::I, 1.35, 4.40, 0.450),
        ];
        Self {
            name: "typed".to_string(),
            globals: GlobalParams {
                bond_force_constant: 350.0,
                angle_force_constant: 60.0,
                bond_order_correction: 0.12,
                dielectric_constant: 4.0,
                scale_14: 0.75,
            },
            universal: false,
            elements: table
                .into_iter()
                .map(|(element, bond_radius, vdw_radius, well_depth)| {
                    (
                        element.symbol().to_string(),
                        ElementParam {
                            bond_radius,
                            vdw_radius,
                            well_depth,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Radii-derived parameters covering every element. General but coarse.
    pub fn universal() -> Self {
        Self {
            name: "universal".to_string(),
            globals: GlobalParams {
                bond_force_constant: 300.0,
                angle_force_constant: 50.0,
                bond_order_correction: 0.1332,
                dielectric_constant: 1.0,
                scale_14: 1.0,
            },
            universal: true,
            elements: HashMap::new(),
        }
    }

    /// Looks up the parameters for `element`, or `None` if this set does not cover it.
    pub fn element(&self, element: Element) -> Option<ElementParam> {
        if let Some(param) = self.elements.get(element.symbol()) {
            return Some(*param);
        }
        self.universal.then(|| {
            let data = element.data();
            ElementParam {
                bond_radius: data.covalent_radius,
                vdw_radius: data.vdw_distance,
                well_depth: data.vdw_well_depth,
            }
        })
    }

    /// Rest length of a bond between two atoms of the given radii.
    pub fn bond_length(&self, r1: f64, r2: f64, multiplicity: f64) -> f64 {
        let sum = r1 + r2;
        sum - self.globals.bond_order_correction * sum * multiplicity.ln()
    }
}
