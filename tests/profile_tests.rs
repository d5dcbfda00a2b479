use automapper::{
    BidirectionalMapper, Converter, Mappable, MappingEngine, MappingProfile, ProfileRegistry,
};
use chrono::NaiveDate;

#[derive(Debug, Clone, Default, PartialEq, Mappable)]
struct Employee {
    id: i64,
    full_name: String,
    hired: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Mappable)]
struct EmployeeDto {
    id: i64,
    name: String,
    hired: String,
}

struct EmployeeProfile;

impl MappingProfile for EmployeeProfile {
    fn configure(&self, engine: &MappingEngine) {
        engine.configure_mapping::<Employee, EmployeeDto>([("full_name", "name")]);
        engine.add_type_converter::<Employee, EmployeeDto>(
            "hired",
            Converter::new(|d: NaiveDate| d.format("%Y-%m-%d").to_string()),
        );
        engine.configure_mapping::<EmployeeDto, Employee>([("name", "full_name")]);
    }
}

fn employee() -> Employee {
    Employee {
        id: 17,
        full_name: "Katherine Johnson".into(),
        hired: NaiveDate::from_ymd_opt(1953, 6, 1).unwrap(),
    }
}

#[test]
fn test_profile_registration_configures_engine() {
    let engine = MappingEngine::new();
    let registry = ProfileRegistry::new(&engine);
    registry.register("employees", EmployeeProfile);

    assert!(registry.contains("employees"));
    assert_eq!(registry.names(), vec!["employees".to_string()]);

    let dto: EmployeeDto = engine.map(&employee()).unwrap();
    assert_eq!(dto.name, "Katherine Johnson");
    assert_eq!(dto.hired, "1953-06-01");

    // removing a profile keeps what it configured
    assert!(registry.remove("employees").is_some());
    assert!(!registry.contains("employees"));
    let dto: EmployeeDto = engine.map(&employee()).unwrap();
    assert_eq!(dto.name, "Katherine Johnson");
}

#[test]
fn test_closure_profiles() {
    let engine = MappingEngine::new();
    let registry = ProfileRegistry::new(&engine);
    registry.register("ids-only", |engine: &MappingEngine| {
        engine.ignore_field::<Employee, EmployeeDto>("full_name");
        engine.ignore_field::<Employee, EmployeeDto>("hired");
    });

    let dto: EmployeeDto = engine.map(&employee()).unwrap();
    assert_eq!(dto, EmployeeDto { id: 17, ..Default::default() });
    assert!(registry.get("ids-only").is_some());
    assert!(registry.get("missing").is_none());
}

#[test]
fn test_bidirectional_round_trip() {
    let engine = MappingEngine::new();
    let mapper = BidirectionalMapper::<Employee, EmployeeDto>::new(&engine);
    mapper
        .configure_forward(|m| {
            m.configure_mapping([("full_name", "name")]);
        })
        .configure_reverse(|m| {
            m.configure_mapping([("name", "full_name")]);
        });

    let original = employee();
    let dto = mapper.map_forward(&original).unwrap();
    assert_eq!(dto.name, original.full_name);
    // implicit date formatting uses the engine default
    assert_eq!(dto.hired, "01/06/1953");

    let back = mapper.map_reverse(&dto).unwrap();
    assert_eq!(back, original);
}

#[test]
fn test_bidirectional_directions_are_independent() {
    let engine = MappingEngine::new();
    let mapper = BidirectionalMapper::<Employee, EmployeeDto>::new(&engine);
    mapper.configure_forward(|m| {
        m.ignore_field("id");
    });

    let dto = mapper.map_forward(&employee()).unwrap();
    assert_eq!(dto.id, 0);

    let back = mapper
        .map_reverse(&EmployeeDto {
            id: 5,
            ..Default::default()
        })
        .unwrap();
    assert_eq!(back.id, 5);

    assert!(mapper.forward().config().is_ignored("id"));
    assert!(!mapper.reverse().config().is_ignored("id"));
    assert_ne!(mapper.forward().pair(), mapper.reverse().pair());
}
