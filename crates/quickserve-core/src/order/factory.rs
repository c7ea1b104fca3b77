//! # Order Factories
//!
//! One factory per service channel. Each one owns the channel's physical
//! resources (tables, drive-thru lanes), issues ids through the
//! [`RestaurantContext`] and remembers what it created.
//!
//! ```text
//! ┌──────────────┐   create_order(ctx, request)   ┌──────────────────────┐
//! │ DineIn       │ ─────────────────────────────► │ table assigned       │
//! │ DriveThru    │ ─────────────────────────────► │ lane slot taken      │
//! │ Takeout      │ ─────────────────────────────► │ pickup time checked  │
//! │ Delivery     │ ─────────────────────────────► │ radius checked       │
//! └──────────────┘                                └──────────────────────┘
//!                                                   │
//!                                                   ▼
//!                                       Order { id: ORD000042, Pending }
//! ```

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;
use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use tracing::{info, warn};

use super::{Order, OrderKind, OrderType, DELIVERY_MAX_DISTANCE_M};
use crate::context::RestaurantContext;
use crate::error::{CoreError, CoreResult, ValidationError};

/// Tables in a standard dining room.
pub const DEFAULT_TABLE_CAPACITY: u32 = 60;

/// Cars that fit in one drive-thru lane.
pub const CARS_PER_LANE: usize = 10;

/// Lane reserved for express orders.
pub const EXPRESS_LANE: u32 = 1;

/// Default pickup lead time for takeout orders without a requested time.
const DEFAULT_PICKUP_MINUTES: i64 = 15;

/// One entry in a factory's creation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactoryRecord {
    pub order_id: String,
    pub customer_id: Option<String>,
    pub created_at: NaiveDateTime,
}

/// Creates orders for one service channel.
pub trait OrderFactory {
    /// Channel-specific input.
    type Request;

    fn order_type(&self) -> OrderType;

    fn create_order(&mut self, ctx: &mut RestaurantContext, request: Self::Request) -> CoreResult<Order>;

    /// Orders created so far, oldest first.
    fn history(&self) -> &[FactoryRecord];

    fn created_count(&self) -> usize {
        self.history().len()
    }
}

fn issue_order(
    ctx: &mut RestaurantContext,
    history: &mut Vec<FactoryRecord>,
    customer_id: Option<String>,
    kind: OrderKind,
) -> Order {
    let now = ctx.now();
    let id = ctx.next_order_id(kind.order_type());
    history.push(FactoryRecord {
        order_id: id.clone(),
        customer_id: customer_id.clone(),
        created_at: now,
    });
    info!(order_id = %id, order_type = %kind.order_type(), "Order created");
    Order::new(id, customer_id, kind, ctx.tax_rate(), now)
}

// =============================================================================
// Dine-In
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct DineInRequest {
    pub customer_id: Option<String>,
    pub party_size: u32,
    /// Specific table; `None` lets the factory choose.
    pub table: Option<u32>,
}

/// Occupancy snapshot of the dining room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeatingStatus {
    pub capacity: u32,
    pub occupied: u32,
    pub available: u32,
    /// Occupied tables with their orders, by table number.
    pub tables: BTreeMap<u32, String>,
}

#[derive(Debug, Clone)]
pub struct DineInFactory {
    capacity: u32,
    occupied: BTreeMap<u32, String>,
    history: Vec<FactoryRecord>,
}

impl Default for DineInFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl DineInFactory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_TABLE_CAPACITY)
    }

    pub fn with_capacity(capacity: u32) -> Self {
        DineInFactory {
            capacity,
            occupied: BTreeMap::new(),
            history: Vec::new(),
        }
    }

    /// Preferred tables by party size: couples near the counter, families
    /// in the middle, large groups at the back.
    fn preferred_range(party_size: u32) -> RangeInclusive<u32> {
        match party_size {
            0..=2 => 1..=20,
            3..=4 => 21..=40,
            _ => 41..=60,
        }
    }

    fn is_free(&self, table: u32) -> bool {
        (1..=self.capacity).contains(&table) && !self.occupied.contains_key(&table)
    }

    fn pick_table(&self, party_size: u32) -> Option<u32> {
        Self::preferred_range(party_size)
            .find(|t| self.is_free(*t))
            .or_else(|| (1..=self.capacity).find(|t| self.is_free(*t)))
    }

    /// Frees the table held by `order_id`, returning its number.
    pub fn release_table(&mut self, order_id: &str) -> Option<u32> {
        let table = self
            .occupied
            .iter()
            .find(|(_, id)| id.as_str() == order_id)
            .map(|(t, _)| *t)?;
        self.occupied.remove(&table);
        info!(order_id, table, "Table released");
        Some(table)
    }

    pub fn seating_status(&self) -> SeatingStatus {
        let occupied = self.occupied.len() as u32;
        SeatingStatus {
            capacity: self.capacity,
            occupied,
            available: self.capacity.saturating_sub(occupied),
            tables: self.occupied.clone(),
        }
    }
}

impl OrderFactory for DineInFactory {
    type Request = DineInRequest;

    fn order_type(&self) -> OrderType {
        OrderType::DineIn
    }

    fn create_order(&mut self, ctx: &mut RestaurantContext, request: DineInRequest) -> CoreResult<Order> {
        if request.party_size == 0 {
            return Err(ValidationError::MustBePositive {
                field: "party_size".to_string(),
            }
            .into());
        }

        let table = match request.table {
            Some(table) if self.is_free(table) => table,
            Some(table) => return Err(CoreError::TableUnavailable { table }),
            None => self.pick_table(request.party_size).ok_or_else(|| {
                warn!(party_size = request.party_size, "Dining room full");
                CoreError::NoTablesAvailable {
                    party_size: request.party_size,
                }
            })?,
        };

        let order = issue_order(
            ctx,
            &mut self.history,
            request.customer_id,
            OrderKind::DineIn {
                table,
                party_size: request.party_size,
            },
        );
        self.occupied.insert(table, order.id().to_string());
        Ok(order)
    }

    fn history(&self) -> &[FactoryRecord] {
        &self.history
    }
}

// =============================================================================
// Drive-Thru
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct DriveThruRequest {
    pub customer_id: Option<String>,
    pub vehicle: String,
    pub express: bool,
}

#[derive(Debug, Clone)]
pub struct DriveThruFactory {
    /// Order ids waiting in each lane; index 0 is lane 1.
    lanes: Vec<Vec<String>>,
    history: Vec<FactoryRecord>,
}

impl Default for DriveThruFactory {
    fn default() -> Self {
        Self::new(2)
    }
}

impl DriveThruFactory {
    /// A drive-thru with `lanes` lanes (at least one). Lane 1 is express.
    pub fn new(lanes: u32) -> Self {
        DriveThruFactory {
            lanes: vec![Vec::new(); lanes.max(1) as usize],
            history: Vec::new(),
        }
    }

    pub fn lane_count(&self) -> u32 {
        self.lanes.len() as u32
    }

    /// Cars waiting per lane, lane 1 first.
    pub fn queue_lengths(&self) -> Vec<usize> {
        self.lanes.iter().map(Vec::len).collect()
    }

    pub fn total_queued(&self) -> usize {
        self.lanes.iter().map(Vec::len).sum()
    }

    fn has_room(&self, lane: u32) -> bool {
        self.lanes
            .get(lane as usize - 1)
            .map_or(false, |q| q.len() < CARS_PER_LANE)
    }

    /// Express requests go to lane 1 while it has room. Everyone else gets
    /// the shortest regular lane; a single-lane drive-thru serves everybody
    /// from lane 1.
    fn pick_lane(&self, express: bool) -> Option<u32> {
        if express && self.has_room(EXPRESS_LANE) {
            return Some(EXPRESS_LANE);
        }
        let first_regular = if self.lanes.len() == 1 { 1 } else { 2 };
        (first_regular..=self.lane_count())
            .filter(|lane| self.has_room(*lane))
            .min_by_key(|lane| self.lanes[*lane as usize - 1].len())
    }

    /// Removes a served car from its lane, returning the lane.
    pub fn complete(&mut self, order_id: &str) -> Option<u32> {
        for (idx, queue) in self.lanes.iter_mut().enumerate() {
            if let Some(pos) = queue.iter().position(|id| id == order_id) {
                queue.remove(pos);
                info!(order_id, lane = idx + 1, "Drive-thru order completed");
                return Some(idx as u32 + 1);
            }
        }
        None
    }
}

impl OrderFactory for DriveThruFactory {
    type Request = DriveThruRequest;

    fn order_type(&self) -> OrderType {
        OrderType::DriveThru
    }

    fn create_order(&mut self, ctx: &mut RestaurantContext, request: DriveThruRequest) -> CoreResult<Order> {
        let lane = self.pick_lane(request.express).ok_or_else(|| {
            warn!(queued = self.total_queued(), "Drive-thru at capacity");
            CoreError::DriveThruFull {
                lanes: self.lane_count(),
            }
        })?;

        let vehicle = if request.vehicle.trim().is_empty() {
            "car".to_string()
        } else {
            request.vehicle
        };

        let order = issue_order(
            ctx,
            &mut self.history,
            request.customer_id,
            OrderKind::DriveThru { lane, vehicle },
        );
        self.lanes[lane as usize - 1].push(order.id().to_string());
        Ok(order)
    }

    fn history(&self) -> &[FactoryRecord] {
        &self.history
    }
}

// =============================================================================
// Takeout
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct TakeoutRequest {
    pub customer_id: Option<String>,
    /// Requested pickup; defaults to 15 minutes from now.
    pub pickup_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Default)]
pub struct TakeoutFactory {
    history: Vec<FactoryRecord>,
}

impl TakeoutFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderFactory for TakeoutFactory {
    type Request = TakeoutRequest;

    fn order_type(&self) -> OrderType {
        OrderType::Takeout
    }

    fn create_order(&mut self, ctx: &mut RestaurantContext, request: TakeoutRequest) -> CoreResult<Order> {
        let now = ctx.now();
        let pickup_at = match request.pickup_at {
            Some(at) if at < now => {
                return Err(ValidationError::InvalidFormat {
                    field: "pickup_at".to_string(),
                    reason: "pickup time cannot be in the past".to_string(),
                }
                .into())
            }
            Some(at) => at,
            None => now + Duration::minutes(DEFAULT_PICKUP_MINUTES),
        };

        Ok(issue_order(
            ctx,
            &mut self.history,
            request.customer_id,
            OrderKind::Takeout {
                pickup_at: Some(pickup_at),
            },
        ))
    }

    fn history(&self) -> &[FactoryRecord] {
        &self.history
    }
}

// =============================================================================
// Delivery
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct DeliveryRequest {
    pub customer_id: Option<String>,
    pub address: String,
    pub distance_m: u32,
    pub express: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DeliveryFactory {
    history: Vec<FactoryRecord>,
}

impl DeliveryFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OrderFactory for DeliveryFactory {
    type Request = DeliveryRequest;

    fn order_type(&self) -> OrderType {
        OrderType::Delivery
    }

    fn create_order(&mut self, ctx: &mut RestaurantContext, request: DeliveryRequest) -> CoreResult<Order> {
        let address = request.address.trim();
        if address.is_empty() {
            return Err(ValidationError::Required {
                field: "address".to_string(),
            }
            .into());
        }
        if request.distance_m > DELIVERY_MAX_DISTANCE_M {
            return Err(ValidationError::OutOfRange {
                field: "distance_m".to_string(),
                min: 0,
                max: DELIVERY_MAX_DISTANCE_M as i64,
            }
            .into());
        }

        Ok(issue_order(
            ctx,
            &mut self.history,
            request.customer_id,
            OrderKind::Delivery {
                address: address.to_string(),
                distance_m: request.distance_m,
                express: request.express,
            },
        ))
    }

    fn history(&self) -> &[FactoryRecord] {
        &self.history
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::order::OrderStatus;
    use std::sync::Arc;

    fn ctx() -> RestaurantContext {
        RestaurantContext::default().with_clock(Arc::new(FixedClock::at(2024, 3, 6, 12, 0).unwrap()))
    }

    fn party(size: u32) -> DineInRequest {
        DineInRequest {
            party_size: size,
            ..Default::default()
        }
    }

    fn table_of(order: &Order) -> u32 {
        match order.kind() {
            OrderKind::DineIn { table, .. } => *table,
            other => panic!("not dine-in: {:?}", other),
        }
    }

    fn lane_of(order: &Order) -> u32 {
        match order.kind() {
            OrderKind::DriveThru { lane, .. } => *lane,
            other => panic!("not drive-thru: {:?}", other),
        }
    }

    #[test]
    fn test_dine_in_preferred_tables() {
        let mut ctx = ctx();
        let mut factory = DineInFactory::new();

        let couple = factory.create_order(&mut ctx, party(2)).unwrap();
        let family = factory.create_order(&mut ctx, party(4)).unwrap();
        let group = factory.create_order(&mut ctx, party(8)).unwrap();

        assert_eq!(table_of(&couple), 1);
        assert_eq!(table_of(&family), 21);
        assert_eq!(table_of(&group), 41);
        assert_eq!(couple.id(), "ORD000001");
        assert_eq!(couple.status(), OrderStatus::Pending);
        assert_eq!(factory.created_count(), 3);
        assert_eq!(ctx.orders_of_type(OrderType::DineIn), 3);
    }

    #[test]
    fn test_dine_in_explicit_and_release() {
        let mut ctx = ctx();
        let mut factory = DineInFactory::with_capacity(2);

        let first = factory
            .create_order(
                &mut ctx,
                DineInRequest {
                    table: Some(2),
                    party_size: 2,
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(matches!(
            factory.create_order(
                &mut ctx,
                DineInRequest {
                    table: Some(2),
                    party_size: 2,
                    ..Default::default()
                }
            ),
            Err(CoreError::TableUnavailable { table: 2 })
        ));
        assert!(matches!(
            factory.create_order(
                &mut ctx,
                DineInRequest {
                    table: Some(9),
                    party_size: 2,
                    ..Default::default()
                }
            ),
            Err(CoreError::TableUnavailable { table: 9 })
        ));

        // Large party falls back to any free table.
        let second = factory.create_order(&mut ctx, party(6)).unwrap();
        assert_eq!(table_of(&second), 1);
        assert!(matches!(
            factory.create_order(&mut ctx, party(2)),
            Err(CoreError::NoTablesAvailable { party_size: 2 })
        ));

        assert_eq!(factory.seating_status().available, 0);
        assert_eq!(factory.release_table(first.id()), Some(2));
        assert_eq!(factory.release_table(first.id()), None);
        assert_eq!(factory.seating_status().available, 1);
        assert!(factory.create_order(&mut ctx, party(0)).is_err());
    }

    #[test]
    fn test_drive_thru_lanes() {
        let mut ctx = ctx();
        let mut factory = DriveThruFactory::new(3);

        let express = factory
            .create_order(
                &mut ctx,
                DriveThruRequest {
                    express: true,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(lane_of(&express), 1);

        let a = factory.create_order(&mut ctx, DriveThruRequest::default()).unwrap();
        let b = factory.create_order(&mut ctx, DriveThruRequest::default()).unwrap();
        let c = factory.create_order(&mut ctx, DriveThruRequest::default()).unwrap();
        assert_eq!((lane_of(&a), lane_of(&b), lane_of(&c)), (2, 3, 2));
        assert_eq!(factory.queue_lengths(), vec![1, 2, 1]);

        assert_eq!(factory.complete(a.id()), Some(2));
        assert_eq!(factory.complete("ORD999999"), None);
        assert_eq!(factory.total_queued(), 3);
    }

    #[test]
    fn test_drive_thru_full() {
        let mut ctx = ctx();
        let mut factory = DriveThruFactory::new(1);
        for _ in 0..CARS_PER_LANE {
            factory.create_order(&mut ctx, DriveThruRequest::default()).unwrap();
        }
        assert!(matches!(
            factory.create_order(&mut ctx, DriveThruRequest::default()),
            Err(CoreError::DriveThruFull { lanes: 1 })
        ));
    }

    #[test]
    fn test_takeout_pickup_time() {
        let mut ctx = ctx();
        let now = ctx.now();
        let mut factory = TakeoutFactory::new();

        let asap = factory.create_order(&mut ctx, TakeoutRequest::default()).unwrap();
        assert_eq!(
            asap.kind(),
            &OrderKind::Takeout {
                pickup_at: Some(now + Duration::minutes(15))
            }
        );

        let past = TakeoutRequest {
            pickup_at: Some(now - Duration::minutes(1)),
            ..Default::default()
        };
        assert!(factory.create_order(&mut ctx, past).is_err());
        assert_eq!(factory.created_count(), 1);
    }

    #[test]
    fn test_delivery_requests() {
        let mut ctx = ctx();
        let mut factory = DeliveryFactory::new();

        let order = factory
            .create_order(
                &mut ctx,
                DeliveryRequest {
                    address: " 1 Main St ".into(),
                    distance_m: 4_000,
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(order.service_fee().cents(), 499);

        let far = DeliveryRequest {
            address: "Far Away".into(),
            distance_m: 20_001,
            ..Default::default()
        };
        assert!(factory.create_order(&mut ctx, far).is_err());
        assert!(factory.create_order(&mut ctx, DeliveryRequest::default()).is_err());
        assert_eq!(factory.history()[0].order_id, order.id());
    }
}
