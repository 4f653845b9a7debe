//! Material, construction and construction layer records

use super::{Insertable, InsertableWithChildren};
use crate::db::statement::{BoundStatement, StatementKind};
use crate::error::DbResult;
use crate::model::{ConstructionData, MaterialData};
use rusqlite::Connection;
use tracing::trace;

/// Row of `Materials`
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialRecord {
    number: i32,
    material: MaterialData,
}

impl MaterialRecord {
    pub fn new(number: i32, material: &MaterialData) -> Self {
        Self {
            number,
            material: material.clone(),
        }
    }
}

impl Insertable for MaterialRecord {
    fn statement(&self) -> StatementKind {
        StatementKind::MaterialsInsert
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        let m = &self.material;
        stmt.bind_int(1, self.number.into())?;
        stmt.bind_text(2, &m.name)?;
        stmt.bind_int(3, m.group.into())?;
        stmt.bind_int(4, m.roughness.into())?;
        stmt.bind_real(5, m.conductivity)?;
        stmt.bind_real(6, m.density)?;
        stmt.bind_real(7, m.iso_moist_cap)?;
        stmt.bind_real(8, m.porosity)?;
        stmt.bind_real(9, m.resistance)?;
        stmt.bind_bool(10, m.r_only)?;
        stmt.bind_real(11, m.spec_heat)?;
        stmt.bind_real(12, m.therm_grad_coef)?;
        stmt.bind_real(13, m.thickness)?;
        stmt.bind_real(14, m.vapor_diffus)
    }
}

/// Row of `ConstructionLayers`
///
/// Layer numbers are 1-based, 1 being the outside layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConstructionLayerRecord {
    construction: i32,
    layer: i32,
    material: i32,
}

impl ConstructionLayerRecord {
    pub fn new(construction: i32, layer: i32, material: i32) -> Self {
        Self {
            construction,
            layer,
            material,
        }
    }

    pub fn layer(&self) -> i32 {
        self.layer
    }

    pub fn material(&self) -> i32 {
        self.material
    }
}

impl Insertable for ConstructionLayerRecord {
    fn statement(&self) -> StatementKind {
        StatementKind::ConstructionLayersInsert
    }

    fn number(&self) -> i32 {
        self.construction
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        stmt.bind_int(1, self.construction.into())?;
        stmt.bind_int(2, self.layer.into())?;
        stmt.bind_int(3, self.material.into())
    }
}

/// Row of `Constructions` plus its ordered layers
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructionRecord {
    number: i32,
    construction: ConstructionData,
    u_value: f64,
    layers: Vec<ConstructionLayerRecord>,
}

impl ConstructionRecord {
    /// Snapshot a construction; `u_value` is the nominal U-factor computed
    /// by the engine
    pub fn new(number: i32, construction: &ConstructionData, u_value: f64) -> Self {
        let layers = construction
            .layers
            .iter()
            .zip(1..)
            .map(|(&material, layer)| ConstructionLayerRecord::new(number, layer, material))
            .collect();

        Self {
            number,
            construction: construction.clone(),
            u_value,
            layers,
        }
    }

    pub fn layers(&self) -> &[ConstructionLayerRecord] {
        &self.layers
    }
}

impl Insertable for ConstructionRecord {
    fn statement(&self) -> StatementKind {
        StatementKind::ConstructionsInsert
    }

    fn number(&self) -> i32 {
        self.number
    }

    fn bind(&self, stmt: &mut BoundStatement<'_>) -> DbResult<()> {
        let c = &self.construction;
        stmt.bind_int(1, self.number.into())?;
        stmt.bind_text(2, &c.name)?;
        stmt.bind_int(3, self.layers.len() as i64)?;
        stmt.bind_int(4, c.tot_solid_layers.into())?;
        stmt.bind_int(5, c.tot_glass_layers.into())?;
        stmt.bind_real(6, c.inside_absorp_vis)?;
        stmt.bind_real(7, c.outside_absorp_vis)?;
        stmt.bind_real(8, c.inside_absorp_solar)?;
        stmt.bind_real(9, c.outside_absorp_solar)?;
        stmt.bind_real(10, c.inside_absorp_thermal)?;
        stmt.bind_real(11, c.outside_absorp_thermal)?;
        stmt.bind_int(12, c.outside_roughness.into())?;
        stmt.bind_bool(13, c.type_is_window)?;
        stmt.bind_real(14, self.u_value)
    }
}

impl InsertableWithChildren for ConstructionRecord {
    fn insert_with_children(&self, conn: &Connection) -> DbResult<()> {
        self.insert(conn)?;
        for layer in &self.layers {
            layer.insert(conn)?;
        }
        trace!(
            construction = self.number,
            layers = self.layers.len(),
            "Construction layers written"
        );
        Ok(())
    }
}
