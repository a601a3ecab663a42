use crate::models::energy::{CARBON_CATEGORIES, COOPERATIVE_TYPES, WATER_NEEDS};
use crate::models::{CarbonEquivalence, Cooperative, EnergyService, Municipality, PlantSpecies};
use nexo_factories::{
    fake, ActiveState, BelongsTo, CustomState, Factory, FactoryState, FeaturedState, HasFactory, InactiveState,
    Sequence, StateFn, VerifiedState,
};
use serde_json::json;

/// Province, INE province code, approximate centre
const PROVINCE_DATA: &[(&str, &str, f64, f64)] = &[
    ("Madrid", "28", 40.42, -3.70),
    ("Barcelona", "08", 41.39, 2.17),
    ("Valencia", "46", 39.47, -0.38),
    ("Sevilla", "41", 37.39, -5.98),
    ("Bizkaia", "48", 43.26, -2.93),
    ("Gipuzkoa", "20", 43.32, -1.98),
    ("A Coruña", "15", 43.36, -8.41),
    ("Navarra", "31", 42.81, -1.65),
    ("Zaragoza", "50", 41.65, -0.88),
    ("Girona", "17", 41.98, 2.82),
    ("Asturias", "33", 43.36, -5.85),
    ("Málaga", "29", 36.72, -4.42),
];

#[derive(Debug, Default, Clone)]
pub struct MunicipalityFactory;

impl Factory for MunicipalityFactory {
    type Model = Municipality;

    fn definition(&self) -> nexo_factories::Attributes {
        let (province, town) = fake::municipality();
        let (code, lat, lon) = PROVINCE_DATA
            .iter()
            .find(|(name, ..)| *name == province)
            .map(|(_, code, lat, lon)| (*code, *lat, *lon))
            .unwrap_or(("28", 40.42, -3.70));

        // the capital shares the province name and is the biggest town
        let population = if town == province {
            fake::number_between(150_000, 3_300_000)
        } else {
            fake::number_between(2_000, 120_000)
        };

        attributes! {
            "name" => town,
            "province" => province,
            "ine_code" => format!("{}{}", code, fake::numerify("###")),
            "population" => population,
            "latitude" => fake::decimal(lat - 0.5, lat + 0.5, 6),
            "longitude" => fake::decimal(lon - 0.5, lon + 0.5, 6),
        }
    }

    fn unique_columns(&self) -> &'static [&'static str] {
        &["ine_code"]
    }
}

impl HasFactory for Municipality {
    type Factory = MunicipalityFactory;
}

/// Name templates per cooperative type; `{town}` and `{word}` are filled in
fn cooperative_name(cooperative_type: &str, town: &str) -> String {
    let templates: &[&str] = match cooperative_type {
        "energy" => &["Som Energia {town}", "{town} Renovable", "Energía Común {town}", "Goiener {town}", "Sol de {town}"],
        "housing" => &["Vivienda Cooperativa {town}", "Cohabitatge {town}", "Hogares {word}"],
        "agriculture" => &["Cooperativa Agrícola {town}", "Huerta de {town}", "Campo {word}"],
        "consumer" => &["Consumo Responsable {town}", "Mercado {word} de {town}"],
        "work" => &["Cooperativa de Trabajo {word}", "Colectivo {word} {town}"],
        _ => &["Servicios Comunes {town}", "Red {word} {town}"],
    };

    let mut word = fake::word();
    if let Some(first) = word.chars().next() {
        let upper: String = first.to_uppercase().collect();
        word.replace_range(..first.len_utf8(), &upper);
    }

    fake::random_element(templates).replace("{town}", town).replace("{word}", &word)
}

#[derive(Debug, Default, Clone)]
pub struct CooperativeFactory;

impl Factory for CooperativeFactory {
    type Model = Cooperative;

    fn definition(&self) -> nexo_factories::Attributes {
        let cooperative_type = if fake::random_bool(0.5) {
            "energy"
        } else {
            fake::random_element(COOPERATIVE_TYPES)
        };
        let (_, town) = fake::municipality();
        let name = cooperative_name(cooperative_type, &town);
        let slug = fake::slugify(&name);

        attributes! {
            "name" => name,
            "legal_name" => format!("{} S.Coop.", name),
            "tax_id" => fake::cif_for('F'),
            "cooperative_type" => cooperative_type,
            "founded_at" => fake::past_date(40),
            "members_count" => fake::number_between(5, 5_000),
            "website" => fake::optional(0.8, || format!("https://www.{}.coop", slug)),
            "email" => format!("info@{}.coop", slug),
            "phone" => fake::optional(0.9, fake::phone),
            "description" => fake::optional(0.7, || fake::text(500)),
            "is_verified" => fake::random_bool(0.6),
            "is_active" => fake::random_bool(0.9),
            "accepts_new_members" => fake::random_bool(0.7),
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, {
            "verified" => VerifiedState,
            "active" => ActiveState,
            "inactive" => CustomState::new("inactive")
                .with_bool_flag("is_active", false)
                .with_bool_flag("accepts_new_members", false),
            "energy" => StateFn::new("energy", |attributes| {
                let town = fake::municipality().1;
                let name = cooperative_name("energy", &town);
                attributes.insert("cooperative_type".into(), json!("energy"));
                attributes.insert("legal_name".into(), json!(format!("{} S.Coop.", name)));
                attributes.insert("name".into(), json!(name));
            }),
        })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["verified", "active", "inactive", "energy"]
    }

    fn belongs_to(&self) -> Vec<BelongsTo> {
        vec![BelongsTo::required("municipality_id", "municipalities")]
    }

    fn unique_columns(&self) -> &'static [&'static str] {
        &["tax_id"]
    }
}

impl HasFactory for Cooperative {
    type Factory = CooperativeFactory;
}

/// Service shape for one category
struct ServiceTemplate {
    names: &'static [&'static str],
    description: &'static str,
    price: (f64, f64),
    unit: &'static str,
}

fn service_template(category: &str) -> ServiceTemplate {
    match category {
        "electricity_supply" => ServiceTemplate {
            names: &["Tarifa 2.0TD renovable", "Tarifa socios 3.0TD", "Suministro 100% renovable"],
            description: "Comercialización de electricidad con origen renovable certificado.",
            price: (0.09, 0.25),
            unit: "kwh",
        },
        "solar_installation" => ServiceTemplate {
            names: &["Instalación fotovoltaica doméstica", "Placas solares para comunidades", "Kit solar balcón"],
            description: "Diseño, tramitación e instalación de paneles fotovoltaicos.",
            price: (1_500.0, 12_000.0),
            unit: "installation",
        },
        "self_consumption" => ServiceTemplate {
            names: &["Autoconsumo compartido", "Comunidad energética de barrio"],
            description: "Gestión de autoconsumo colectivo y reparto de excedentes.",
            price: (5.0, 30.0),
            unit: "month",
        },
        "energy_audit" => ServiceTemplate {
            names: &["Auditoría energética del hogar", "Certificado de eficiencia"],
            description: "Análisis de consumos y propuestas de ahorro.",
            price: (90.0, 450.0),
            unit: "service",
        },
        "ev_charging" => ServiceTemplate {
            names: &["Punto de recarga cooperativo", "Recarga rápida para socios"],
            description: "Recarga de vehículo eléctrico con energía de la cooperativa.",
            price: (0.25, 0.55),
            unit: "kwh",
        },
        _ => ServiceTemplate {
            names: &["Mantenimiento de instalaciones", "Revisión anual de placas"],
            description: "Mantenimiento preventivo y correctivo de instalaciones renovables.",
            price: (40.0, 120.0),
            unit: "hour",
        },
    }
}

#[derive(Debug, Default, Clone)]
pub struct EnergyServiceFactory;

impl Factory for EnergyServiceFactory {
    type Model = EnergyService;

    fn definition(&self) -> nexo_factories::Attributes {
        let category = fake::random_element(crate::models::energy::ENERGY_SERVICE_CATEGORIES);
        let template = service_template(category);

        attributes! {
            "category" => category,
            "name" => fake::random_element(template.names),
            "description" => template.description,
            "price" => fake::decimal(template.price.0, template.price.1, 2),
            "price_unit" => template.unit,
            "is_active" => fake::random_bool(0.85),
            "is_featured" => fake::random_bool(0.15),
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, {
            "active" => ActiveState,
            "inactive" => InactiveState,
            "featured" => FeaturedState,
        })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["active", "inactive", "featured"]
    }

    fn belongs_to(&self) -> Vec<BelongsTo> {
        vec![BelongsTo::required("cooperative_id", "cooperatives")]
    }
}

impl HasFactory for EnergyService {
    type Factory = EnergyServiceFactory;
}

/// (name, kg CO2 range, unit) per category
fn carbon_templates(category: &str) -> &'static [(&'static str, (f64, f64), &'static str)] {
    match category {
        "transport" => &[
            ("Kilómetro en coche de gasolina", (0.15, 0.22), "km"),
            ("Kilómetro en autobús urbano", (0.06, 0.10), "km"),
            ("Vuelo Madrid-Barcelona", (90.0, 130.0), "trayecto"),
            ("Kilómetro en tren de alta velocidad", (0.02, 0.04), "km"),
        ],
        "food" => &[
            ("Kilo de carne de vacuno", (25.0, 60.0), "kg"),
            ("Litro de leche", (1.1, 1.6), "litro"),
            ("Kilo de tomates de invernadero", (0.7, 2.0), "kg"),
        ],
        "energy" => &[
            ("kWh de la red eléctrica", (0.15, 0.30), "kWh"),
            ("Metro cúbico de gas natural", (1.8, 2.1), "m3"),
            ("Litro de gasóleo de calefacción", (2.5, 2.8), "litro"),
        ],
        "digital" => &[
            ("Hora de vídeo en streaming", (0.03, 0.10), "hora"),
            ("Correo electrónico con adjunto", (0.01, 0.05), "correo"),
            ("Fabricación de un teléfono móvil", (50.0, 85.0), "unidad"),
        ],
        _ => &[
            ("Ciclo de lavadora a 40 grados", (0.5, 0.8), "ciclo"),
            ("Ducha de diez minutos", (0.8, 2.0), "ducha"),
            ("Bolsa de plástico", (0.01, 0.03), "unidad"),
        ],
    }
}

const CARBON_SOURCES: &[&str] = &[
    "Ministerio para la Transición Ecológica",
    "Oficina Catalana del Canvi Climàtic",
    "IPCC AR6",
    "Agencia Europea de Medio Ambiente",
];

static CARBON_SLUGS: Sequence = Sequence::starting_at(1);

#[derive(Debug, Default, Clone)]
pub struct CarbonEquivalenceFactory;

impl Factory for CarbonEquivalenceFactory {
    type Model = CarbonEquivalence;

    fn definition(&self) -> nexo_factories::Attributes {
        let category = fake::random_element(CARBON_CATEGORIES);
        let (name, (low, high), unit) = fake::random_element(carbon_templates(category));

        attributes! {
            "name" => name,
            "slug" => CARBON_SLUGS.next_with(&fake::slugify(name)),
            "category" => category,
            "co2_kg_equivalent" => fake::decimal(low, high, 3),
            "unit" => unit,
            "description" => fake::optional(0.6, fake::sentence),
            "source" => fake::optional(0.8, || fake::random_element(CARBON_SOURCES)),
            "is_verified" => fake::random_bool(0.5),
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, { "verified" => VerifiedState })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["verified"]
    }

    fn unique_columns(&self) -> &'static [&'static str] {
        &["slug"]
    }
}

impl HasFactory for CarbonEquivalence {
    type Factory = CarbonEquivalenceFactory;
}

/// A species entry of the plant catalogue
struct SpeciesTemplate {
    common_name: &'static str,
    scientific_name: &'static str,
    family: &'static str,
    region: &'static str,
}

const fn species(
    common_name: &'static str,
    scientific_name: &'static str,
    family: &'static str,
    region: &'static str,
) -> SpeciesTemplate {
    SpeciesTemplate {
        common_name,
        scientific_name,
        family,
        region,
    }
}

const TREES: &[SpeciesTemplate] = &[
    species("Encina", "Quercus ilex", "Fagaceae", "Mediterráneo"),
    species("Pino piñonero", "Pinus pinea", "Pinaceae", "Mediterráneo"),
    species("Haya", "Fagus sylvatica", "Fagaceae", "Europa atlántica"),
    species("Drago", "Dracaena draco", "Asparagaceae", "Canarias"),
];

const SHRUBS: &[SpeciesTemplate] = &[
    species("Romero", "Salvia rosmarinus", "Lamiaceae", "Mediterráneo"),
    species("Lentisco", "Pistacia lentiscus", "Anacardiaceae", "Mediterráneo"),
    species("Brezo", "Erica arborea", "Ericaceae", "Península Ibérica"),
];

const HERBS: &[SpeciesTemplate] = &[
    species("Tomillo", "Thymus vulgaris", "Lamiaceae", "Mediterráneo"),
    species("Manzanilla", "Matricaria chamomilla", "Asteraceae", "Europa"),
];

const CLIMBERS: &[SpeciesTemplate] = &[
    species("Hiedra", "Hedera helix", "Araliaceae", "Europa"),
    species("Madreselva", "Lonicera implexa", "Caprifoliaceae", "Mediterráneo"),
];

const SUCCULENTS: &[SpeciesTemplate] = &[
    species("Cardón", "Euphorbia canariensis", "Euphorbiaceae", "Canarias"),
    species("Siempreviva", "Sempervivum tectorum", "Crassulaceae", "Alpes"),
];

/// Catalogue, CO2 kg/year range and height range in metres per plant type
fn plant_templates(plant_type: &str) -> (&'static [SpeciesTemplate], (f64, f64), (f64, f64)) {
    match plant_type {
        "tree" => (TREES, (10.0, 50.0), (8.0, 30.0)),
        "shrub" => (SHRUBS, (1.0, 8.0), (0.5, 4.0)),
        "herb" => (HERBS, (0.1, 1.0), (0.1, 0.6)),
        "climber" => (CLIMBERS, (0.5, 3.0), (2.0, 15.0)),
        _ => (SUCCULENTS, (0.2, 2.0), (0.1, 3.0)),
    }
}

#[derive(Debug, Default, Clone)]
pub struct PlantSpeciesFactory;

impl Factory for PlantSpeciesFactory {
    type Model = PlantSpecies;

    fn definition(&self) -> nexo_factories::Attributes {
        let plant_type = fake::random_element(crate::models::energy::PLANT_TYPES);
        let (catalogue, co2, height) = plant_templates(plant_type);
        let entry = &catalogue[fake::number_between(0, catalogue.len() as i64 - 1) as usize];
        let water_needs = match plant_type {
            "succulent" => "low",
            "herb" => fake::random_element(&["low", "medium"]),
            _ => fake::random_element(WATER_NEEDS),
        };

        attributes! {
            "common_name" => entry.common_name,
            "scientific_name" => entry.scientific_name,
            "family" => entry.family,
            "plant_type" => plant_type,
            "co2_absorption_kg_year" => fake::decimal(co2.0, co2.1, 2),
            "max_height_m" => fake::decimal(height.0, height.1, 1),
            "water_needs" => water_needs,
            "native_region" => entry.region,
            "is_endemic" => entry.region == "Canarias",
            "is_verified" => fake::random_bool(0.4),
        }
    }

    fn state(&self, name: &str) -> Option<Box<dyn FactoryState>> {
        states!(name, {
            "endemic" => CustomState::new("endemic").with_bool_flag("is_endemic", true),
            "verified" => VerifiedState,
        })
    }

    fn state_names(&self) -> &'static [&'static str] {
        &["endemic", "verified"]
    }
}

impl HasFactory for PlantSpecies {
    type Factory = PlantSpeciesFactory;
}
