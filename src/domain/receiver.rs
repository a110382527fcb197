//! Receiver contact fields shared by order creation and order edits.

pub const RECEIVER_PHONE_LENGTH: usize = 10;
pub const MIN_SHIPPING_ADDRESS_LENGTH: usize = 10;
pub const MAX_RECEIVER_NOTE_LENGTH: usize = 500;

pub fn validate_receiver_name(name: &str) -> Result<(), String>{
    if name.trim().is_empty() {
        return Err("Receiver name is required".into())
    }
    Ok(())
}

pub fn validate_shipping_address(address: &str) -> Result<(), String>{
    let address = address.trim();
    if address.is_empty() {
        return Err("Shipping address is required".into())
    }
    if address.chars().count() < MIN_SHIPPING_ADDRESS_LENGTH {
        return Err(format!(
            "Shipping address must be at least {} characters",
            MIN_SHIPPING_ADDRESS_LENGTH
        ))
    }
    Ok(())
}

pub fn validate_receiver_note(note: Option<&str>) -> Result<(), String>{
    match note {
        Some(note) if note.chars().count() > MAX_RECEIVER_NOTE_LENGTH => Err(format!(
            "Receiver note must be at most {} characters",
            MAX_RECEIVER_NOTE_LENGTH
        )),
        _ => Ok(())
    }
}

// Length is checked before the character class
pub fn validate_receiver_phone(phone: &str) -> Result<(), String>{
    if phone.chars().count() != RECEIVER_PHONE_LENGTH {
        return Err("Invalid phone number length".into())
    }
    if !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err("Phone number must contain only digits".into())
    }
    Ok(())
}
