use std::sync::Arc;

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use skyfare_catalog::{FlightInventory, PricingEngine};
use skyfare_core::models::{Booking, BookingStatus, FlightRef, Passenger};
use skyfare_core::{CoreError, CoreResult};
use skyfare_store::{MemStore, Mutation};

use crate::models::{BookingPage, BookingPolicy, BookingStats, TicketDetails};
use crate::reference;

const MAX_PAGE_SIZE: u32 = 100;

/// Coordinates Inventory, Pricing and Wallet to create and cancel bookings
/// as one atomic unit of work each, and owns the booking lifecycle.
pub struct BookingService {
    store: Arc<MemStore>,
    inventory: Arc<FlightInventory>,
    pricing: Arc<PricingEngine>,
    policy: BookingPolicy,
}

impl BookingService {
    pub fn new(
        store: Arc<MemStore>,
        inventory: Arc<FlightInventory>,
        pricing: Arc<PricingEngine>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            store,
            inventory,
            pricing,
            policy,
        }
    }

    /// Create a booking: lock in the current dynamic price, generate the
    /// reference and seats, then persist booking + wallet debit + seat
    /// decrement in one atomic batch. Any failure leaves all three untouched.
    pub async fn create_booking(
        &self,
        user_id: Uuid,
        flight_ref: &FlightRef,
        passengers: Vec<Passenger>,
    ) -> CoreResult<Booking> {
        self.validate_passengers(&passengers)?;

        let flight = self
            .inventory
            .resolve(flight_ref)
            .await
            .ok_or_else(|| CoreError::NotFound("flight".to_string()))?;

        let requested = passengers.len() as i32;
        if flight.seats_available < requested {
            // Early rejection; the same check is re-run under the store lock.
            return Err(CoreError::InsufficientSeats {
                requested,
                available: flight.seats_available,
            });
        }

        let per_seat = self.pricing.price_for(&flight, user_id).await?;
        let total_amount = per_seat * passengers.len() as i64;

        // ThreadRng is !Send; keep it in its own scope so the future stays Send.
        let (pnr, seats) = {
            let mut rng = rand::thread_rng();
            let pnr = reference::booking_reference(&mut rng);
            let seats = reference::assign_seats(&mut rng, passengers.len());
            (pnr, seats)
        };

        let booking = Booking::new(
            user_id,
            flight.id,
            passengers,
            total_amount,
            pnr.clone(),
            seats,
        );

        self.store
            .apply(vec![
                Mutation::InsertBooking(booking.clone()),
                Mutation::DebitWallet {
                    user_id,
                    amount: total_amount,
                    description: format!("Flight booking {} - {}", pnr, flight.flight_number),
                },
                Mutation::AdjustSeats {
                    flight_id: flight.id,
                    delta: -requested,
                },
            ])
            .await?;

        info!(
            booking = %booking.id,
            reference = %pnr,
            flight = %flight.flight_number,
            total_amount,
            "booking confirmed"
        );
        Ok(booking)
    }

    /// Cancel a confirmed booking: status change, seat release and refund
    /// credit apply together or not at all. The refund keeps back the
    /// configured cancellation fee.
    pub async fn cancel_booking(&self, booking_id: Uuid, user_id: Uuid) -> CoreResult<Booking> {
        let booking = self.owned_booking(booking_id, user_id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(CoreError::AlreadyCancelled(booking_id));
        }

        let refund =
            booking.total_amount * (100 - self.policy.cancellation_fee_percent) / 100;

        self.store
            .apply(vec![
                Mutation::SetBookingStatus {
                    booking_id,
                    status: BookingStatus::Cancelled,
                },
                Mutation::AdjustSeats {
                    flight_id: booking.flight_id,
                    delta: booking.passenger_count(),
                },
                Mutation::CreditWallet {
                    user_id,
                    amount: refund,
                    description: format!("Refund for booking {}", booking.reference),
                },
            ])
            .await?;

        info!(booking = %booking_id, refund, "booking cancelled");
        self.store
            .booking(booking_id)
            .await
            .ok_or_else(|| CoreError::Internal("booking vanished after cancel".to_string()))
    }

    /// A user's bookings, newest first, paginated.
    pub async fn user_bookings(
        &self,
        user_id: Uuid,
        page: u32,
        page_size: u32,
    ) -> CoreResult<BookingPage> {
        let all = self.store.bookings_for_user(user_id).await;
        let page = page.max(1);
        let page_size = page_size.clamp(1, MAX_PAGE_SIZE);

        let total = all.len();
        let pages = (total as u32).div_ceil(page_size).max(1);
        // Widen before multiplying: page and page_size are caller-controlled.
        // Any skip past the end yields an empty page, so clamp to total.
        let skip = ((page as u64 - 1) * page_size as u64).min(total as u64) as usize;
        let bookings = all
            .into_iter()
            .skip(skip)
            .take(page_size as usize)
            .collect();

        Ok(BookingPage {
            bookings,
            total,
            page,
            pages,
        })
    }

    /// Read one booking, enforcing ownership.
    pub async fn booking(&self, booking_id: Uuid, user_id: Uuid) -> CoreResult<Booking> {
        self.owned_booking(booking_id, user_id).await
    }

    /// Booking joined with its flight, for ticket rendering. Same access
    /// checks as [`BookingService::booking`].
    pub async fn ticket(&self, booking_id: Uuid, user_id: Uuid) -> CoreResult<TicketDetails> {
        let booking = self.owned_booking(booking_id, user_id).await?;
        let flight = self
            .store
            .flight(booking.flight_id)
            .await
            .ok_or_else(|| CoreError::NotFound(format!("flight {}", booking.flight_id)))?;
        Ok(TicketDetails::from_parts(booking, flight))
    }

    /// Aggregate figures across all of a user's bookings.
    pub async fn stats(&self, user_id: Uuid) -> CoreResult<BookingStats> {
        let bookings = self.store.bookings_for_user(user_id).await;
        let now = Utc::now();

        let mut stats = BookingStats {
            total_bookings: bookings.len(),
            upcoming_bookings: 0,
            cancelled_bookings: 0,
            total_spent: 0,
        };
        for booking in &bookings {
            stats.total_spent += booking.total_amount;
            match booking.status {
                BookingStatus::Cancelled => stats.cancelled_bookings += 1,
                BookingStatus::Confirmed => {
                    let departs_later = self
                        .store
                        .flight(booking.flight_id)
                        .await
                        .map(|f| f.departure_time > now)
                        .unwrap_or(false);
                    if departs_later {
                        stats.upcoming_bookings += 1;
                    }
                }
                BookingStatus::Pending => {}
            }
        }
        Ok(stats)
    }

    async fn owned_booking(&self, booking_id: Uuid, user_id: Uuid) -> CoreResult<Booking> {
        let booking = self
            .store
            .booking(booking_id)
            .await
            .ok_or_else(|| CoreError::NotFound(format!("booking {booking_id}")))?;
        if booking.user_id != user_id {
            return Err(CoreError::Unauthorized(
                "booking belongs to a different user".to_string(),
            ));
        }
        Ok(booking)
    }

    fn validate_passengers(&self, passengers: &[Passenger]) -> CoreResult<()> {
        if passengers.is_empty() {
            return Err(CoreError::Validation(
                "at least one passenger is required".to_string(),
            ));
        }
        if passengers.len() > self.policy.max_passengers {
            return Err(CoreError::Validation(format!(
                "at most {} passengers per booking",
                self.policy.max_passengers
            )));
        }
        if passengers.iter().any(|p| p.name.trim().is_empty()) {
            return Err(CoreError::Validation(
                "every passenger needs a name".to_string(),
            ));
        }
        Ok(())
    }
}
