//! Simulation model entities handed over by the engine
//!
//! These are plain data structs mirroring the engine's zone, surface and
//! load definitions. The output layer only reads them: record writers copy
//! what they need at construction, so the engine is free to mutate or drop
//! its model afterwards.

/// Thermal zone geometry and bookkeeping
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneData {
    pub name: String,
    pub rel_north: f64,
    pub origin_x: f64,
    pub origin_y: f64,
    pub origin_z: f64,
    pub centroid_x: f64,
    pub centroid_y: f64,
    pub centroid_z: f64,
    pub of_type: i32,
    pub multiplier: i32,
    pub list_multiplier: i32,
    pub minimum_x: f64,
    pub maximum_x: f64,
    pub minimum_y: f64,
    pub maximum_y: f64,
    pub minimum_z: f64,
    pub maximum_z: f64,
    pub ceiling_height: f64,
    pub volume: f64,
    pub inside_convection_algo: i32,
    pub outside_convection_algo: i32,
    pub floor_area: f64,
    pub ext_gross_wall_area: f64,
    pub ext_net_wall_area: f64,
    pub ext_window_area: f64,
    pub is_part_of_total_area: bool,
}

/// Named list of zone numbers
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneListData {
    pub name: String,
    /// Member zone numbers, in list order
    pub zones: Vec<i32>,
}

/// Zone list repeated by a multiplier
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneGroupData {
    pub name: String,
    /// Zone list number
    pub zone_list: i32,
    pub multiplier: i32,
}

/// Heat transfer or shading surface
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SurfaceData {
    pub name: String,
    /// Construction number
    pub construction: i32,
    pub area: f64,
    pub gross_area: f64,
    pub perimeter: f64,
    pub azimuth: f64,
    pub height: f64,
    pub reveal: f64,
    pub shape: i32,
    pub sides: i32,
    pub tilt: f64,
    pub width: f64,
    pub heat_trans_surf: bool,
    /// Base surface number (self for base surfaces)
    pub base_surf: i32,
    /// Zone number
    pub zone: i32,
    pub ext_bound_cond: i32,
    pub ext_solar: bool,
    pub ext_wind: bool,
}

/// Opaque or glazing material properties
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaterialData {
    pub name: String,
    pub group: i32,
    pub roughness: i32,
    pub conductivity: f64,
    pub density: f64,
    pub iso_moist_cap: f64,
    pub porosity: f64,
    pub resistance: f64,
    pub r_only: bool,
    pub spec_heat: f64,
    pub therm_grad_coef: f64,
    pub thickness: f64,
    pub vapor_diffus: f64,
}

/// Layered construction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstructionData {
    pub name: String,
    /// Material number of each layer, outside to inside
    pub layers: Vec<i32>,
    pub tot_solid_layers: i32,
    pub tot_glass_layers: i32,
    pub inside_absorp_vis: f64,
    pub outside_absorp_vis: f64,
    pub inside_absorp_solar: f64,
    pub outside_absorp_solar: f64,
    pub inside_absorp_thermal: f64,
    pub outside_absorp_thermal: f64,
    pub outside_roughness: i32,
    pub type_is_window: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScheduleData {
    pub name: String,
    pub schedule_type: String,
    pub min_value: f64,
    pub max_value: f64,
}

/// Lights object
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightsData {
    pub name: String,
    pub zone_ptr: i32,
    pub sched_ptr: i32,
    pub design_level: f64,
    pub fraction_return_air: f64,
    pub fraction_radiant: f64,
    pub fraction_short_wave: f64,
    pub fraction_replaceable: f64,
    pub fraction_convected: f64,
    pub end_use_subcategory: String,
}

/// People object, including thermal comfort settings
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeopleData {
    pub name: String,
    pub zone_ptr: i32,
    pub number_of_people: f64,
    pub number_of_people_ptr: i32,
    pub activity_level_ptr: i32,
    pub fraction_radiant: f64,
    pub fraction_convected: f64,
    pub work_eff_ptr: i32,
    pub clothing_ptr: i32,
    pub air_velocity_ptr: i32,
    pub fanger: bool,
    pub pierce: bool,
    pub ksu: bool,
    pub mrt_calc_type: i32,
    pub surface_ptr: i32,
    pub angle_factor_list_name: String,
    pub angle_factor_list_ptr: i32,
    pub user_spec_sens_frac: f64,
    pub show_55_warning: bool,
}

/// Electric, gas, steam, hot water or other equipment
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ZoneEquipData {
    pub name: String,
    pub zone_ptr: i32,
    pub sched_ptr: i32,
    pub design_level: f64,
    pub fraction_latent: f64,
    pub fraction_radiant: f64,
    pub fraction_lost: f64,
    pub fraction_convected: f64,
    pub end_use_subcategory: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseboardHeatData {
    pub name: String,
    pub zone_ptr: i32,
    pub sched_ptr: i32,
    pub cap_at_low_temperature: f64,
    pub low_temperature: f64,
    pub cap_at_high_temperature: f64,
    pub high_temperature: f64,
    pub fraction_radiant: f64,
    pub fraction_convected: f64,
    pub end_use_subcategory: String,
}

/// Infiltration or ventilation design flow
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirflowData {
    pub name: String,
    pub zone_ptr: i32,
    pub sched_ptr: i32,
    pub design_level: f64,
}

/// Room air model assigned to a zone
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AirModelData {
    pub air_model_name: String,
    pub air_model_type: i32,
    pub temp_couple_scheme: i32,
    pub sim_air_model: bool,
}
