//! Vehicle model and fleet registry validation

use fleet_sim::simulation::{
    default_fleet, FleetError, FleetManager, Terrain, Vehicle, VehicleError, VehicleKind,
    VehicleSpec, MAINTENANCE_INTERVAL,
};

fn fueled(kind: VehicleKind, id: &str, fuel: f64) -> Vehicle {
    let mut vehicle = Vehicle::new(kind, id, "Model", 100.0).unwrap();
    if fuel > 0.0 {
        vehicle.refuel(fuel).unwrap();
    }
    vehicle
}

#[test]
fn test_vehicle_rejects_empty_id() {
    assert_eq!(
        Vehicle::new(VehicleKind::Car, "", "Sedan", 120.0).unwrap_err(),
        VehicleError::EmptyId
    );
}

#[test]
fn test_advance_burns_fuel_and_adds_mileage() {
    let mut truck = fueled(VehicleKind::Truck, "Truck-1", 10.0);

    let used = truck.advance(16.0).unwrap();

    assert_eq!(used, 2.0);
    assert_eq!(truck.fuel_level(), Some(8.0));
    assert_eq!(truck.mileage(), 16.0);
}

#[test]
fn test_advance_without_enough_fuel_changes_nothing() {
    let mut car = fueled(VehicleKind::Car, "Car-1", 1.0);

    let err = car.advance(30.0).unwrap_err();

    assert!(matches!(err, VehicleError::InsufficientFuel { .. }));
    assert_eq!(car.fuel_level(), Some(1.0));
    assert_eq!(car.mileage(), 0.0);
}

#[test]
fn test_negative_distance_is_rejected() {
    let mut car = fueled(VehicleKind::Car, "Car-1", 10.0);
    assert_eq!(car.advance(-1.0), Err(VehicleError::InvalidDistance(-1.0)));
}

#[test]
fn test_sail_ship_has_no_tank() {
    let mut ship = Vehicle::new(VehicleKind::CargoShip { sail: true }, "Ship-1", "Clipper", 30.0).unwrap();

    assert_eq!(ship.fuel_level(), None);
    assert_eq!(ship.advance(100.0), Ok(0.0));
    assert_eq!(ship.mileage(), 100.0);
    assert!(matches!(ship.refuel(10.0), Err(VehicleError::NoFuelTank(_))));
}

#[test]
fn test_motor_ship_burns_fuel() {
    let mut ship = fueled(VehicleKind::CargoShip { sail: false }, "Ship-2", 10.0);
    assert_eq!(ship.advance(8.0), Ok(2.0));
    assert_eq!(ship.fuel_level(), Some(8.0));
}

#[test]
fn test_refuel_rejects_non_positive_amounts() {
    let mut car = fueled(VehicleKind::Car, "Car-1", 0.0);
    assert_eq!(car.refuel(0.0), Err(VehicleError::InvalidFuelAmount(0.0)));
    assert_eq!(car.refuel(-3.0), Err(VehicleError::InvalidFuelAmount(-3.0)));
    assert_eq!(car.fuel_level(), Some(0.0));
}

#[test]
fn test_mileage_ignores_non_positive_deltas() {
    let mut car = fueled(VehicleKind::Car, "Car-1", 0.0);
    car.add_mileage(5.0);
    car.add_mileage(-2.0);
    car.add_mileage(0.0);
    assert_eq!(car.mileage(), 5.0);
}

#[test]
fn test_maintenance_due_after_service_interval() {
    let mut bus = fueled(VehicleKind::Bus, "Bus-1", 0.0);
    bus.add_mileage(MAINTENANCE_INTERVAL - 1.0);
    assert!(!bus.needs_maintenance());

    bus.add_mileage(1.0);
    assert!(bus.needs_maintenance());
    bus.refuel(100.0).unwrap();
    assert!(matches!(bus.advance(1.0), Err(VehicleError::NeedsMaintenance(_))));

    bus.perform_maintenance();
    assert!(!bus.needs_maintenance());
    assert!(bus.advance(1.0).is_ok());
}

#[test]
fn test_scheduled_maintenance_blocks_movement() {
    let mut plane = fueled(VehicleKind::Airplane, "Plane-1", 100.0);
    plane.schedule_maintenance();

    assert!(plane.needs_maintenance());
    assert!(plane.advance(1.0).is_err());

    plane.perform_maintenance();
    assert!(plane.advance(1.0).is_ok());
}

#[test]
fn test_heavy_truck_is_less_efficient() {
    let mut truck = fueled(VehicleKind::Truck, "Truck-1", 0.0);
    assert_eq!(truck.fuel_efficiency(), 8.0);

    truck.load_cargo(2_500.0).unwrap();
    assert_eq!(truck.fuel_efficiency(), 8.0);

    truck.load_cargo(1.0).unwrap();
    assert!((truck.fuel_efficiency() - 7.2).abs() < 1e-9);
}

#[test]
fn test_cargo_limits() {
    let mut bus = fueled(VehicleKind::Bus, "Bus-1", 0.0);

    assert!(bus.load_cargo(400.0).is_ok());
    assert!(matches!(bus.load_cargo(200.0), Err(VehicleError::Overload { .. })));
    assert_eq!(bus.load_cargo(0.0), Err(VehicleError::InvalidWeight(0.0)));
    assert!(matches!(bus.unload_cargo(500.0), Err(VehicleError::NotOnBoard { .. })));
    assert!(bus.unload_cargo(400.0).is_ok());
    assert_eq!(bus.cargo(), 0.0);
}

#[test]
fn test_passenger_limits() {
    let mut car = fueled(VehicleKind::Car, "Car-1", 0.0);

    assert!(car.board_passengers(4).is_ok());
    assert!(matches!(car.board_passengers(2), Err(VehicleError::Overload { .. })));
    assert!(car.board_passengers(1).is_ok());
    assert!(matches!(car.disembark_passengers(6), Err(VehicleError::NotOnBoard { .. })));
    assert!(car.disembark_passengers(5).is_ok());
    assert_eq!(car.passengers(), 0);

    let mut truck = fueled(VehicleKind::Truck, "Truck-1", 0.0);
    assert!(matches!(truck.board_passengers(1), Err(VehicleError::NoCabin(_))));
}

#[test]
fn test_journey_time_by_terrain() {
    let car = Vehicle::new(VehicleKind::Car, "Car-1", "Sedan", 100.0).unwrap();
    let plane = Vehicle::new(VehicleKind::Airplane, "Plane-1", "Jet", 100.0).unwrap();
    let ship = Vehicle::new(VehicleKind::CargoShip { sail: true }, "Ship-1", "Clipper", 100.0).unwrap();

    assert!((car.estimate_journey_time(100.0).unwrap() - 1.1).abs() < 1e-9);
    assert!((plane.estimate_journey_time(100.0).unwrap() - 0.95).abs() < 1e-9);
    assert!((ship.estimate_journey_time(100.0).unwrap() - 1.15).abs() < 1e-9);

    let parked = Vehicle::new(VehicleKind::Car, "Car-2", "Sedan", 0.0).unwrap();
    assert_eq!(parked.estimate_journey_time(10.0), Err(VehicleError::InvalidSpeed(0.0)));
}

#[test]
fn test_spec_builds_fueled_vehicle() {
    let vehicle = VehicleSpec::new(VehicleKind::Bus, "Bus-1", "CityBus", 80.0)
        .with_fuel(40.0)
        .with_mileage(12.0)
        .build()
        .unwrap();

    assert_eq!(vehicle.fuel_level(), Some(40.0));
    assert_eq!(vehicle.mileage(), 12.0);
    assert_eq!(vehicle.kind().terrain(), Terrain::Land);
}

#[test]
fn test_fleet_rejects_duplicate_ids() {
    let mut fleet = FleetManager::new();
    fleet.add_vehicle(fueled(VehicleKind::Car, "Car-1", 0.0)).unwrap();

    assert_eq!(
        fleet.add_vehicle(fueled(VehicleKind::Bus, "Car-1", 0.0)),
        Err(FleetError::DuplicateId("Car-1".into()))
    );
    assert_eq!(fleet.len(), 1);
}

#[test]
fn test_fleet_remove_and_lookup() {
    let mut fleet = FleetManager::from_specs(&default_fleet());
    assert_eq!(fleet.len(), 3);

    let removed = fleet.remove_vehicle("Bus-A").unwrap();
    assert_eq!(removed.model(), "CityBus");
    assert!(fleet.get("Bus-A").is_none());
    assert_eq!(
        fleet.remove_vehicle("Bus-A").unwrap_err(),
        FleetError::NotFound("Bus-A".into())
    );
}

#[test]
fn test_fleet_journeys_report_each_outcome() {
    let mut fleet = FleetManager::new();
    fleet.add_vehicle(fueled(VehicleKind::Truck, "Truck-1", 10.0)).unwrap();
    fleet.add_vehicle(fueled(VehicleKind::Car, "Car-1", 0.0)).unwrap();

    let outcomes = fleet.start_all_journeys(8.0);

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].1, Ok(1.0));
    assert!(outcomes[1].1.is_err());

    assert_eq!(fleet.start_journey("Truck-1", 8.0), Ok(1.0));
    assert!(matches!(
        fleet.start_journey("Nope", 1.0),
        Err(FleetError::NotFound(_))
    ));
}

#[test]
fn test_fleet_refuel_all_skips_tankless_vehicles() {
    let mut fleet = FleetManager::new();
    fleet.add_vehicle(fueled(VehicleKind::Car, "Car-1", 0.0)).unwrap();
    fleet
        .add_vehicle(Vehicle::new(VehicleKind::CargoShip { sail: true }, "Ship-1", "Clipper", 30.0).unwrap())
        .unwrap();

    assert_eq!(fleet.refuel_all(20.0), 1);
    assert_eq!(fleet.get("Car-1").unwrap().fuel_level(), Some(20.0));
}

#[test]
fn test_fleet_maintenance_queries() {
    let mut fleet = FleetManager::from_specs(&default_fleet());
    fleet.get_mut("Car-A").unwrap().schedule_maintenance();

    let due: Vec<_> = fleet.needing_maintenance().iter().map(|v| v.id().to_string()).collect();
    assert_eq!(due, vec!["Car-A"]);

    assert_eq!(fleet.maintain_all(), 1);
    assert!(fleet.needing_maintenance().is_empty());
}

#[test]
fn test_fleet_search_and_sort() {
    let mut fleet = FleetManager::from_specs(&default_fleet());
    fleet
        .add_vehicle(Vehicle::new(VehicleKind::Airplane, "Plane-A", "Jumbo", 900.0).unwrap())
        .unwrap();

    assert_eq!(fleet.search_by_kind(VehicleKind::Bus).len(), 1);
    assert_eq!(fleet.search_by_terrain(Terrain::Land).len(), 3);
    assert_eq!(fleet.search_by_terrain(Terrain::Water).len(), 0);

    fleet.sort_by_efficiency();
    let order: Vec<_> = fleet.iter().map(|v| v.id().to_string()).collect();
    assert_eq!(order, vec!["Plane-A", "Truck-A", "Bus-A", "Car-A"]);

    assert_eq!(fleet.fastest().unwrap().id().as_str(), "Plane-A");
    assert_eq!(fleet.slowest().unwrap().id().as_str(), "Bus-A");
    assert_eq!(
        fleet.distinct_models_sorted(),
        vec!["CityBus", "Hauler", "Jumbo", "Sedan"]
    );
}

#[test]
fn test_fleet_total_fuel_consumption() {
    let fleet = FleetManager::from_specs(&default_fleet());
    let expected = 120.0 / 15.0 + 120.0 / 10.0 + 120.0 / 8.0;
    assert!((fleet.total_fuel_consumption(120.0) - expected).abs() < 1e-9);
}

#[test]
fn test_fleet_report_lists_every_vehicle() {
    let fleet = FleetManager::from_specs(&default_fleet());
    let report = fleet.report();

    assert!(report.contains("3 vehicles"));
    for id in ["Car-A", "Bus-A", "Truck-A"] {
        assert!(report.contains(id), "missing {} in report:\n{}", id, report);
    }
}
