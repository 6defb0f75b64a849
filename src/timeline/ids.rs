use super::entities::TodoId;

/// Id for a newly created todo. Based on a millisecond timestamp, moved forward until it no
/// longer collides with an id that is already taken.
pub fn fresh_id(millis: i64, taken: impl Fn(&str) -> bool) -> TodoId {
    let mut value = millis;
    loop {
        let id = value.to_string();
        if !taken(&id) {
            return id;
        }
        value += 1;
    }
}

/// Id for a todo carried into the next day.
pub fn transferred_id(previous: &str, millis: i64, taken: impl Fn(&str) -> bool) -> TodoId {
    let mut suffix = millis;
    loop {
        let id = format!("{previous}-transferred-{suffix}");
        if !taken(&id) {
            return id;
        }
        suffix += 1;
    }
}
