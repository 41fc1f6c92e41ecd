//! Health route server.
//!
//! Plans trips that deliberately end with a walk (or a ride) of a chosen
//! length: drive most of the way and walk the rest, or take transit and get
//! off a few stops early.
//!
//! ```
//! use health_route_server::domain::{Coordinate, TravelMode};
//! use health_route_server::graph::GraphBuilder;
//! use health_route_server::planner::{DriveWalkPlanner, PlannerConfig};
//!
//! let walk = GraphBuilder::new(TravelMode::Walk)
//!     .node(1, 45.510, -73.580)
//!     .node(2, 45.506, -73.584)
//!     .two_way(1, 2, 672.0, 480.0)
//!     .build()
//!     .unwrap();
//! let car = GraphBuilder::new(TravelMode::Car)
//!     .node(10, 45.500, -73.600)
//!     .node(20, 45.506, -73.584)
//!     .two_way(10, 20, 2780.0, 0.0)
//!     .build()
//!     .unwrap();
//!
//! let config = PlannerConfig::default();
//! let route = DriveWalkPlanner::new(&walk, &car, &config)
//!     .plan(
//!         Coordinate::new(45.500, -73.600),
//!         Coordinate::new(45.510, -73.580),
//!         10.0,
//!     )
//!     .unwrap();
//! assert_eq!(route.steps.len(), 2);
//! ```

pub mod config;
pub mod directions;
pub mod domain;
pub mod graph;
pub mod planner;
pub mod response;
pub mod search;
pub mod transit;
pub mod web;
