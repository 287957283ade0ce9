// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AdminRepository, BookingConfig, BookingRepository, BookingService, Clock,
    ModelServiceRepository, OrderMetrics, OrderRepository, OrderService, Principal,
    RepositoryError, SlotRepository, Store, UserRepository,
};
use slot_market_domain::{
    Address, Admin, Booking, ModelService, NewAdmin, NewBooking, NewModelService, NewOrder,
    NewSlot, NewUser, Order, OrderStatus, Pagination, Permissions, Role, Slot, SlotStatus, User,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use time::macros::{date, datetime};
use time::{Duration, OffsetDateTime};

pub const CLIENT_AUTH: i64 = 1001;
pub const OTHER_CLIENT_AUTH: i64 = 1002;
pub const UNVERIFIED_CLIENT_AUTH: i64 = 1003;
pub const MODEL_AUTH: i64 = 2001;
pub const OTHER_MODEL_AUTH: i64 = 2002;
pub const UNVERIFIED_MODEL_AUTH: i64 = 2003;
pub const ADMIN_AUTH: i64 = 9001;

pub const DEFAULT_TTL_SECONDS: i64 = 900;

pub fn base_time() -> OffsetDateTime {
    datetime!(2026-03-01 09:00 UTC)
}

pub fn test_address() -> Address {
    Address {
        street: String::from("Main Street"),
        house: 12,
        apartment: Some(4),
        entrance: None,
        floor: Some(2),
        comment: None,
    }
}

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
}

impl ManualClock {
    pub fn new(now: OffsetDateTime) -> Arc<Self> {
        Arc::new(Self {
            now: Mutex::new(now),
        })
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    pub fn set(&self, at: OffsetDateTime) {
        *self.now.lock().unwrap() = at;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().unwrap()
    }
}

/// Counts completed orders.
#[derive(Clone, Default)]
pub struct RecordingMetrics {
    completed: Arc<AtomicUsize>,
}

impl RecordingMetrics {
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }
}

impl OrderMetrics for RecordingMetrics {
    fn completed_order(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Clone, Default)]
struct Tables {
    next_id: i64,
    users: Vec<User>,
    admins: Vec<Admin>,
    services: Vec<ModelService>,
    slots: Vec<Slot>,
    bookings: Vec<Booking>,
    orders: Vec<Order>,
}

impl Tables {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

/// In-memory `Store` honouring the transaction contract.
///
/// The outermost transaction snapshots every table and restores the snapshot
/// when the unit of work fails. A failure can be injected on the Nth write.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Tables,
    in_transaction: bool,
    writes: usize,
    fail_on_write: Option<usize>,
    missing_on_write: Option<usize>,
    transactions: usize,
}

fn page_of<T: Clone>(items: impl Iterator<Item = T>, page: Pagination) -> Vec<T> {
    items
        .skip(usize::try_from(page.offset()).unwrap())
        .take(usize::try_from(page.limit()).unwrap())
        .collect()
}

impl InMemoryStore {
    /// Makes the `n`th write from now (1-based) fail.
    pub fn fail_on_nth_write(&mut self, n: usize) {
        self.writes = 0;
        self.fail_on_write = Some(n);
    }

    /// Makes the `n`th write from now report its row as missing.
    pub fn missing_on_nth_write(&mut self, n: usize) {
        self.writes = 0;
        self.missing_on_write = Some(n);
    }

    /// Number of writes attempted so far.
    pub const fn writes(&self) -> usize {
        self.writes
    }

    /// Number of outermost transactions opened so far.
    pub const fn transactions(&self) -> usize {
        self.transactions
    }

    pub fn slot(&self, id: i64) -> Slot {
        self.tables.slots.iter().find(|s| s.id == id).cloned().unwrap()
    }

    pub fn booking(&self, id: i64) -> Booking {
        self.tables
            .bookings
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .unwrap()
    }

    pub fn order(&self, id: i64) -> Order {
        self.tables.orders.iter().find(|o| o.id == id).cloned().unwrap()
    }

    pub fn service(&self, id: i64) -> ModelService {
        self.tables
            .services
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .unwrap()
    }

    pub fn booking_count(&self) -> usize {
        self.tables.bookings.len()
    }

    pub fn order_count(&self) -> usize {
        self.tables.orders.len()
    }

    pub fn service_count(&self) -> usize {
        self.tables.services.len()
    }

    /// Overwrites a stored slot directly, bypassing every rule.
    pub fn force_slot_status(&mut self, id: i64, status: SlotStatus) {
        if let Some(slot) = self.tables.slots.iter_mut().find(|s| s.id == id) {
            slot.status = status;
        }
    }

    /// Overwrites a stored order directly, bypassing every rule.
    pub fn force_order_status(&mut self, id: i64, status: OrderStatus) {
        if let Some(order) = self.tables.orders.iter_mut().find(|o| o.id == id) {
            order.status = status;
        }
    }

    fn record_write(&mut self) -> Result<(), RepositoryError> {
        self.writes += 1;
        if self.fail_on_write == Some(self.writes) {
            return Err(RepositoryError::Backend(format!(
                "injected failure on write {}",
                self.writes
            )));
        }
        if self.missing_on_write == Some(self.writes) {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}

impl UserRepository for InMemoryStore {
    fn create_user(&mut self, user: &NewUser) -> Result<User, RepositoryError> {
        self.record_write()?;
        let user = User {
            id: self.tables.next_id(),
            auth_id: user.auth_id,
            role: user.role,
            name: user.name.clone(),
            birth_date: user.birth_date,
            is_verified: false,
            created_at: user.created_at,
        };
        self.tables.users.push(user.clone());
        Ok(user)
    }

    fn get_user(&mut self, id: i64) -> Result<User, RepositoryError> {
        self.tables
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn get_user_by_auth_id(&mut self, auth_id: i64) -> Result<User, RepositoryError> {
        self.tables
            .users
            .iter()
            .find(|u| u.auth_id == auth_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn update_user(&mut self, user: &User) -> Result<(), RepositoryError> {
        self.record_write()?;
        let stored = self
            .tables
            .users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = user.clone();
        Ok(())
    }

    fn list_users(&mut self, page: Pagination) -> Result<Vec<User>, RepositoryError> {
        Ok(page_of(self.tables.users.iter().cloned(), page))
    }

    fn count_users_by_role(&mut self, role: Role) -> Result<u64, RepositoryError> {
        Ok(self.tables.users.iter().filter(|u| u.role == role).count() as u64)
    }
}

impl AdminRepository for InMemoryStore {
    fn create_admin(&mut self, admin: &NewAdmin) -> Result<Admin, RepositoryError> {
        self.record_write()?;
        let admin = Admin {
            id: self.tables.next_id(),
            auth_id: admin.auth_id,
            permissions: admin.permissions.clone(),
        };
        self.tables.admins.push(admin.clone());
        Ok(admin)
    }

    fn get_admin(&mut self, id: i64) -> Result<Admin, RepositoryError> {
        self.tables
            .admins
            .iter()
            .find(|a| a.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn get_admin_by_auth_id(&mut self, auth_id: i64) -> Result<Admin, RepositoryError> {
        self.tables
            .admins
            .iter()
            .find(|a| a.auth_id == auth_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn update_admin(&mut self, admin: &Admin) -> Result<(), RepositoryError> {
        self.record_write()?;
        let stored = self
            .tables
            .admins
            .iter_mut()
            .find(|a| a.id == admin.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = admin.clone();
        Ok(())
    }
}

impl ModelServiceRepository for InMemoryStore {
    fn create_service(
        &mut self,
        service: &NewModelService,
    ) -> Result<ModelService, RepositoryError> {
        self.record_write()?;
        let service = ModelService {
            id: self.tables.next_id(),
            model_id: service.model_id,
            title: service.title.clone(),
            description: service.description.clone(),
            price: service.price,
            is_active: service.is_active,
            created_at: service.created_at,
        };
        self.tables.services.push(service.clone());
        Ok(service)
    }

    fn get_service(&mut self, id: i64) -> Result<ModelService, RepositoryError> {
        self.tables
            .services
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn update_service(&mut self, service: &ModelService) -> Result<(), RepositoryError> {
        self.record_write()?;
        let stored = self
            .tables
            .services
            .iter_mut()
            .find(|s| s.id == service.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = service.clone();
        Ok(())
    }

    fn list_active_services(
        &mut self,
        page: Pagination,
    ) -> Result<Vec<ModelService>, RepositoryError> {
        Ok(page_of(
            self.tables.services.iter().filter(|s| s.is_active).cloned(),
            page,
        ))
    }

    fn list_services_by_model(
        &mut self,
        model_id: i64,
        page: Pagination,
    ) -> Result<Vec<ModelService>, RepositoryError> {
        Ok(page_of(
            self.tables
                .services
                .iter()
                .filter(|s| s.model_id == model_id)
                .cloned(),
            page,
        ))
    }

    fn service_has_bookings(&mut self, service_id: i64) -> Result<bool, RepositoryError> {
        Ok(self
            .tables
            .bookings
            .iter()
            .any(|b| b.service_id == service_id))
    }
}

impl SlotRepository for InMemoryStore {
    fn create_slot(&mut self, slot: &NewSlot) -> Result<Slot, RepositoryError> {
        self.record_write()?;
        let slot = Slot {
            id: self.tables.next_id(),
            model_id: slot.model_id,
            start_time: slot.start_time,
            end_time: slot.end_time,
            status: slot.status,
            created_at: slot.created_at,
        };
        self.tables.slots.push(slot.clone());
        Ok(slot)
    }

    fn get_slot(&mut self, id: i64) -> Result<Slot, RepositoryError> {
        self.tables
            .slots
            .iter()
            .find(|s| s.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn update_slot(&mut self, slot: &Slot) -> Result<(), RepositoryError> {
        self.record_write()?;
        let stored = self
            .tables
            .slots
            .iter_mut()
            .find(|s| s.id == slot.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = slot.clone();
        Ok(())
    }

    fn list_slots_by_model(&mut self, model_id: i64) -> Result<Vec<Slot>, RepositoryError> {
        let mut slots: Vec<Slot> = self
            .tables
            .slots
            .iter()
            .filter(|s| s.model_id == model_id)
            .cloned()
            .collect();
        slots.sort_by_key(|s| s.start_time);
        Ok(slots)
    }

    fn has_overlapping_slot(
        &mut self,
        model_id: i64,
        start: OffsetDateTime,
        end: OffsetDateTime,
        exclude_slot_id: Option<i64>,
    ) -> Result<bool, RepositoryError> {
        Ok(self.tables.slots.iter().any(|s| {
            s.model_id == model_id
                && s.status != SlotStatus::Disabled
                && Some(s.id) != exclude_slot_id
                && s.overlaps(start, end)
        }))
    }
}

impl BookingRepository for InMemoryStore {
    fn create_booking(&mut self, booking: &NewBooking) -> Result<Booking, RepositoryError> {
        self.record_write()?;
        let booking = Booking {
            id: self.tables.next_id(),
            client_id: booking.client_id,
            service_id: booking.service_id,
            slot_id: booking.slot_id,
            address: booking.address.clone(),
            status: booking.status,
            expires_at: booking.expires_at,
            created_at: booking.created_at,
        };
        self.tables.bookings.push(booking.clone());
        Ok(booking)
    }

    fn get_booking(&mut self, id: i64) -> Result<Booking, RepositoryError> {
        self.tables
            .bookings
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn update_booking(&mut self, booking: &Booking) -> Result<(), RepositoryError> {
        self.record_write()?;
        let stored = self
            .tables
            .bookings
            .iter_mut()
            .find(|b| b.id == booking.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = booking.clone();
        Ok(())
    }

    fn list_bookings_by_client(
        &mut self,
        client_id: i64,
        page: Pagination,
    ) -> Result<Vec<Booking>, RepositoryError> {
        Ok(page_of(
            self.tables
                .bookings
                .iter()
                .filter(|b| b.client_id == client_id)
                .cloned(),
            page,
        ))
    }

    fn list_bookings_by_model(
        &mut self,
        model_id: i64,
        page: Pagination,
    ) -> Result<Vec<Booking>, RepositoryError> {
        let services: Vec<i64> = self
            .tables
            .services
            .iter()
            .filter(|s| s.model_id == model_id)
            .map(|s| s.id)
            .collect();
        Ok(page_of(
            self.tables
                .bookings
                .iter()
                .filter(|b| services.contains(&b.service_id))
                .cloned(),
            page,
        ))
    }

    fn list_bookings(&mut self, page: Pagination) -> Result<Vec<Booking>, RepositoryError> {
        Ok(page_of(self.tables.bookings.iter().cloned(), page))
    }
}

impl OrderRepository for InMemoryStore {
    fn create_order(&mut self, order: &NewOrder) -> Result<Order, RepositoryError> {
        self.record_write()?;
        if self
            .tables
            .orders
            .iter()
            .any(|o| o.booking_id == order.booking_id)
        {
            return Err(RepositoryError::Backend(String::from(
                "UNIQUE constraint failed: orders.booking_id",
            )));
        }
        let order = Order {
            id: self.tables.next_id(),
            booking_id: order.booking_id,
            status: order.status,
            created_at: order.created_at,
        };
        self.tables.orders.push(order.clone());
        Ok(order)
    }

    fn get_order(&mut self, id: i64) -> Result<Order, RepositoryError> {
        self.tables
            .orders
            .iter()
            .find(|o| o.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    fn update_order(&mut self, order: &Order) -> Result<(), RepositoryError> {
        self.record_write()?;
        let stored = self
            .tables
            .orders
            .iter_mut()
            .find(|o| o.id == order.id)
            .ok_or(RepositoryError::NotFound)?;
        *stored = order.clone();
        Ok(())
    }

    fn list_orders_by_model(
        &mut self,
        model_id: i64,
        page: Pagination,
    ) -> Result<Vec<Order>, RepositoryError> {
        let tables = &self.tables;
        Ok(page_of(
            tables
                .orders
                .iter()
                .filter(|o| {
                    tables
                        .bookings
                        .iter()
                        .find(|b| b.id == o.booking_id)
                        .and_then(|b| tables.services.iter().find(|s| s.id == b.service_id))
                        .is_some_and(|s| s.model_id == model_id)
                })
                .cloned(),
            page,
        ))
    }

    fn list_orders_by_client(
        &mut self,
        client_id: i64,
        page: Pagination,
    ) -> Result<Vec<Order>, RepositoryError> {
        let tables = &self.tables;
        Ok(page_of(
            tables
                .orders
                .iter()
                .filter(|o| {
                    tables
                        .bookings
                        .iter()
                        .any(|b| b.id == o.booking_id && b.client_id == client_id)
                })
                .cloned(),
            page,
        ))
    }

    fn list_orders(&mut self, page: Pagination) -> Result<Vec<Order>, RepositoryError> {
        Ok(page_of(self.tables.orders.iter().cloned(), page))
    }
}

impl Store for InMemoryStore {
    fn with_transaction<T, E, F>(&mut self, work: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        if self.in_transaction {
            return work(self);
        }

        self.transactions += 1;
        let snapshot = self.tables.clone();
        self.in_transaction = true;
        let result = work(self);
        self.in_transaction = false;
        if result.is_err() {
            self.tables = snapshot;
        }
        result
    }
}

/// A seeded marketplace: two verified clients, two verified models, one
/// unverified user of each role, an admin, one active service and one
/// available slot starting three days after [`base_time`].
pub struct Fixture {
    pub store: InMemoryStore,
    pub clock: Arc<ManualClock>,
    pub client: User,
    pub other_client: User,
    pub model: User,
    pub other_model: User,
    pub service: ModelService,
    pub slot: Slot,
}

impl Fixture {
    pub fn new() -> Self {
        let mut store = InMemoryStore::default();
        let now = base_time();

        let client = seed_user(&mut store, CLIENT_AUTH, Role::Client, true);
        let other_client = seed_user(&mut store, OTHER_CLIENT_AUTH, Role::Client, true);
        seed_user(&mut store, UNVERIFIED_CLIENT_AUTH, Role::Client, false);
        let model = seed_user(&mut store, MODEL_AUTH, Role::Model, true);
        let other_model = seed_user(&mut store, OTHER_MODEL_AUTH, Role::Model, true);
        seed_user(&mut store, UNVERIFIED_MODEL_AUTH, Role::Model, false);
        store
            .create_admin(&NewAdmin {
                auth_id: ADMIN_AUTH,
                permissions: Permissions::new(),
            })
            .unwrap();

        let service = store
            .create_service(
                &NewModelService::active(
                    model.id,
                    String::from("Evening session"),
                    String::from("Two hours"),
                    150.0,
                    now,
                )
                .unwrap(),
            )
            .unwrap();

        let slot = store
            .create_slot(
                &NewSlot::available(
                    model.id,
                    now + Duration::days(3),
                    now + Duration::days(3) + Duration::hours(2),
                    now,
                )
                .unwrap(),
            )
            .unwrap();

        Self {
            store,
            clock: ManualClock::new(now),
            client,
            other_client,
            model,
            other_model,
            service,
            slot,
        }
    }

    pub fn booking_service(&self) -> BookingService<Arc<ManualClock>> {
        self.booking_service_with_ttl(DEFAULT_TTL_SECONDS)
    }

    pub fn booking_service_with_ttl(&self, seconds: i64) -> BookingService<Arc<ManualClock>> {
        BookingService::new(
            BookingConfig::from_seconds(seconds).unwrap(),
            Arc::clone(&self.clock),
        )
    }

    pub fn order_service(
        &self,
    ) -> (
        OrderService<Arc<ManualClock>, RecordingMetrics>,
        RecordingMetrics,
    ) {
        let metrics = RecordingMetrics::default();
        (
            OrderService::new(Arc::clone(&self.clock), metrics.clone()),
            metrics,
        )
    }

    /// Publishes another available slot for the fixture model.
    pub fn add_slot(&mut self, starts_in: Duration, length: Duration) -> Slot {
        let now = self.clock.now();
        self.store
            .create_slot(
                &NewSlot::available(self.model.id, now + starts_in, now + starts_in + length, now)
                    .unwrap(),
            )
            .unwrap()
    }

    /// Creates a pending booking of the fixture slot by the fixture client.
    pub fn reserve(&mut self) -> Booking {
        let service = self.booking_service();
        service
            .create_booking(
                &mut self.store,
                &client(),
                self.service.id,
                self.slot.id,
                test_address(),
            )
            .unwrap()
    }

    /// Reserves and approves the fixture slot, returning the confirmed order.
    pub fn confirmed_order(&mut self) -> (Booking, Order) {
        let booking = self.reserve();
        self.booking_service()
            .approve_booking(&mut self.store, &model(), booking.id)
            .unwrap()
    }

    /// Reserves and approves a slot starting `starts_in` from now.
    pub fn confirmed_order_starting_in(&mut self, starts_in: Duration) -> (Booking, Order, Slot) {
        let slot = self.add_slot(starts_in, Duration::hours(1));
        let bookings = self.booking_service();
        let booking = bookings
            .create_booking(
                &mut self.store,
                &client(),
                self.service.id,
                slot.id,
                test_address(),
            )
            .unwrap();
        let (booking, order) = bookings
            .approve_booking(&mut self.store, &model(), booking.id)
            .unwrap();
        (booking, order, slot)
    }
}

fn seed_user(store: &mut InMemoryStore, auth_id: i64, role: Role, verified: bool) -> User {
    let mut user = store
        .create_user(&NewUser {
            auth_id,
            role,
            name: format!("user-{auth_id}"),
            birth_date: date!(1990 - 05 - 17),
            created_at: base_time(),
        })
        .unwrap();
    if verified {
        user.is_verified = true;
        store.update_user(&user).unwrap();
    }
    user
}

pub const fn client() -> Principal {
    Principal::new(CLIENT_AUTH, Role::Client)
}

pub const fn other_client() -> Principal {
    Principal::new(OTHER_CLIENT_AUTH, Role::Client)
}

pub const fn unverified_client() -> Principal {
    Principal::new(UNVERIFIED_CLIENT_AUTH, Role::Client)
}

pub const fn model() -> Principal {
    Principal::new(MODEL_AUTH, Role::Model)
}

pub const fn other_model() -> Principal {
    Principal::new(OTHER_MODEL_AUTH, Role::Model)
}

pub const fn unverified_model() -> Principal {
    Principal::new(UNVERIFIED_MODEL_AUTH, Role::Model)
}

pub const fn admin() -> Principal {
    Principal::new(ADMIN_AUTH, Role::Admin)
}
