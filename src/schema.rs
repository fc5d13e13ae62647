//! Static description of the hotel_booking schema injected into LLM prompts.
//!
//! Hand-maintained rather than generated from INFORMATION_SCHEMA so the
//! prompt wording stays identical across environments. Must be kept in sync
//! with the database migrations.

pub const SCHEMA_OVERVIEW: &str = "\
Main fact table:
  bookings(booking_id, hotel_id, customer_id, room_id, meal_id,
           market_segment_id, distribution_channel_id, deposit_type_id,
           arrival_date_year, arrival_date_month, stays_in_week_nights,
           stays_in_weekend_nights, adr, is_canceled)

Dimension tables:
  hotels(hotel_id, hotel_type)
  customers(customer_id, country, customer_type, is_repeated_guest)
  rooms(room_id, room_code)
  market_segments(market_segment_id, market_segment)
  distribution_channels(distribution_channel_id, channel)
  meals(meal_id, meal)
  deposit_types(deposit_type_id, deposit_type)

Analytical views:
  view_cancel_rates(hotel_type, total_bookings, canceled, cancel_rate)
  view_monthly_occupancy(arrival_date_month, hotel_type, total_bookings)
  view_room_popularity(room_code, total_bookings)
  view_revenue_segments(market_segment, revenue)
  view_meal_plan_adr(meal, hotel_type, avg_adr)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overview_lists_fact_table_and_views() {
        assert!(SCHEMA_OVERVIEW.contains("bookings(booking_id"));
        assert!(SCHEMA_OVERVIEW.contains("view_cancel_rates"));
        assert!(SCHEMA_OVERVIEW.contains("view_meal_plan_adr"));
    }
}
