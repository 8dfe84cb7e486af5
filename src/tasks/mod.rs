pub mod kiosk_reset;
