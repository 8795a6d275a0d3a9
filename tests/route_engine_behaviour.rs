//! End-to-end behaviour of the route engine facade with the native solver.

use std::cell::RefCell;

use kurir_core::test_support::BruteForceSolver;
use kurir_engine::{
    BookError, DistanceMatrix, LocalSearchSolver, Order, OrderBook, OrderDraft, OrderId, Point,
    Region, RouteKey, RoutePlanner, TourSolver, lat_lon,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const TOLERANCE_KM: f64 = 0.01;

struct EngineWorld {
    book: RefCell<OrderBook>,
    planner: RefCell<RoutePlanner<LocalSearchSolver>>,
    multi_drop_km: RefCell<Vec<f64>>,
    depot_outcome: RefCell<Option<Result<(), BookError>>>,
}

#[fixture]
fn world() -> EngineWorld {
    EngineWorld {
        book: RefCell::new(OrderBook::new(Region::default())),
        planner: RefCell::new(RoutePlanner::new(LocalSearchSolver::default())),
        multi_drop_km: RefCell::new(Vec::new()),
        depot_outcome: RefCell::new(None),
    }
}

fn place(name: &str, lat: f64, lon: f64) -> Point {
    Point::new(name, lat_lon(lat, lon))
}

#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn order(id: &str, customer: Point, destination: Point) -> Order {
    Order::new(OrderDraft {
        id: Some(OrderId::new(id)),
        courier: "Dedi".to_owned(),
        customer,
        destination,
        item: "Empal gentong".to_owned(),
        price: 30_000.0,
    })
    .expect("valid order")
}

fn order_key(id: impl Into<String>) -> RouteKey {
    RouteKey::from(OrderId::new(id))
}

#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn route_km(world: &EngineWorld, key: &RouteKey) -> f64 {
    world
        .planner
        .borrow()
        .route(key)
        .expect("route stored")
        .total_distance_km
}

#[given("a depot at Gudang with orders A and B")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn given_depot_and_orders(world: &EngineWorld) {
    let mut book = world.book.borrow_mut();
    book.set_depot(place("Gudang", -6.70, 108.55))
        .expect("depot inside region");
    let home = place("Rumah A", -6.71, 108.56);
    book.upsert_order(order("A", home.clone(), home))
        .expect("order A");
    book.upsert_order(order(
        "B",
        place("Toko B", -6.72, 108.54),
        place("Tujuan B", -6.73, 108.53),
    ))
    .expect("order B");
}

#[given("an empty order book")]
fn given_empty_book(world: &EngineWorld) {
    world.book.replace(OrderBook::new(Region::default()));
}

#[when("order {id} is routed")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_order_routed(world: &EngineWorld, id: String) {
    let book = world.book.borrow();
    let order = book.order(&OrderId::new(id)).expect("order in book");
    world
        .planner
        .borrow_mut()
        .solve_for_order(book.depot(), order)
        .expect("order route");
}

#[when("the multi-drop tour is routed")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn when_multi_drop_routed(world: &EngineWorld) {
    let book = world.book.borrow();
    let km = world
        .planner
        .borrow_mut()
        .solve_multi_drop(book.depot(), book.distinct_points())
        .expect("multi-drop route")
        .total_distance_km;
    world.multi_drop_km.borrow_mut().push(km);
}

#[when("the multi-drop tour is routed again")]
fn when_multi_drop_routed_again(world: &EngineWorld) {
    when_multi_drop_routed(world);
}

#[when("a depot is set at latitude {lat} and longitude {lon}")]
fn when_depot_set(world: &EngineWorld, lat: f64, lon: f64) {
    let outcome = world
        .book
        .borrow_mut()
        .set_depot(place("Dapur", lat, lon));
    world.depot_outcome.replace(Some(outcome));
}

#[then("the route for order {id} visits {stops} stops")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_order_stops(world: &EngineWorld, id: String, stops: usize) {
    let planner = world.planner.borrow();
    let route = planner.route(&order_key(id)).expect("route stored");
    assert_eq!(route.points.len(), stops);
    assert_eq!(route.visit_order, vec![0, 1, 0]);
}

#[then("the route for order {id} starts and ends at the depot")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_order_round_trip(world: &EngineWorld, id: String) {
    let planner = world.planner.borrow();
    let route = planner.route(&order_key(id)).expect("route stored");
    let depot = world.book.borrow().depot().cloned().expect("depot");
    assert_eq!(route.segments.first().map(|leg| &leg.from), Some(&depot));
    assert_eq!(route.segments.last().map(|leg| &leg.to), Some(&depot));
}

#[then("the multi-drop route is a {nodes} node cycle from the depot")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_multi_drop_cycle(world: &EngineWorld, nodes: usize) {
    let planner = world.planner.borrow();
    let route = planner.route(&RouteKey::MultiDrop).expect("route stored");
    assert_eq!(route.points.len(), nodes);
    assert_eq!(route.visit_order.len(), nodes + 1);
    assert_eq!(route.visit_order.first(), Some(&0));
    assert_eq!(route.visit_order.last(), Some(&0));
}

#[then("the multi-drop route is no longer than both order routes together")]
#[expect(
    clippy::float_arithmetic,
    reason = "compares summed route lengths"
)]
fn then_multi_drop_shorter(world: &EngineWorld) {
    let separate = route_km(world, &order_key("A")) + route_km(world, &order_key("B"));
    let combined = route_km(world, &RouteKey::MultiDrop);
    assert!(
        combined <= separate + TOLERANCE_KM,
        "multi-drop {combined} km vs separate {separate} km"
    );
}

#[then("the multi-drop route matches exhaustive search")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
#[expect(clippy::float_arithmetic, reason = "tolerance on tour length")]
fn then_multi_drop_optimal(world: &EngineWorld) {
    let planner = world.planner.borrow();
    let route = planner.route(&RouteKey::MultiDrop).expect("route stored");
    let matrix = DistanceMatrix::build(&route.points);
    let optimal = BruteForceSolver
        .solve(&matrix, 0, std::time::Duration::from_secs(1))
        .expect("exhaustive tour");
    assert!(
        (route.total_distance_km - optimal.total_distance_km).abs() <= TOLERANCE_KM,
        "local search {} km vs optimum {} km",
        route.total_distance_km,
        optimal.total_distance_km
    );
}

#[then("the multi-drop route carries a spanning tree with {edges} edges")]
#[expect(
    clippy::expect_used,
    reason = "behaviour tests use expect for readable failures"
)]
fn then_multi_drop_tree(world: &EngineWorld, edges: usize) {
    let planner = world.planner.borrow();
    let route = planner.route(&RouteKey::MultiDrop).expect("route stored");
    let tree = route.mst.as_ref().expect("spanning tree attached");
    assert_eq!(tree.edges.len(), edges);
    assert!(tree.total_km <= route.total_distance_km);
}

#[then("both multi-drop solves report the same distance")]
fn then_stable(world: &EngineWorld) {
    let solves = world.multi_drop_km.borrow();
    assert_eq!(solves.len(), 2);
    assert_eq!(solves.first(), solves.last());
}

#[then("the depot is rejected as out of region")]
fn then_depot_rejected(world: &EngineWorld) {
    assert!(matches!(
        world.depot_outcome.borrow().as_ref(),
        Some(Err(BookError::OutOfRegion { .. }))
    ));
    assert!(world.book.borrow().depot().is_none());
}

#[scenario(path = "tests/features/route_engine.feature", index = 0)]
fn single_stop_round_trip(world: EngineWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_engine.feature", index = 1)]
fn multi_drop_beats_separate_trips(world: EngineWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_engine.feature", index = 2)]
fn multi_drop_is_stable(world: EngineWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/route_engine.feature", index = 3)]
fn depot_south_of_region(world: EngineWorld) {
    let _ = world;
}
