use velada_model::{Email, NationalId};
use velada_store::{AccountRepository, StoreError};

/// Exact, case-sensitive scan over the whole collection; the stored
/// value and the candidate must be byte-identical to count as taken.
pub fn email_taken(
    accounts: &dyn AccountRepository,
    email: &Email,
) -> Result<bool, StoreError> {
    Ok(accounts
        .list_all()?
        .iter()
        .any(|record| record.email == *email))
}

pub fn national_id_taken(
    accounts: &dyn AccountRepository,
    national_id: &NationalId,
) -> Result<bool, StoreError> {
    Ok(accounts
        .list_all()?
        .iter()
        .any(|record| record.national_id == *national_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use velada_model::{
        AccountRecord, FirstName, LastName, Phone, RecordId, StoredPassword,
    };
    use velada_store::MemoryStore;

    fn seed(store: &MemoryStore) {
        AccountRepository::append(
            store,
            &AccountRecord::new(
                FirstName::parse("Ana").expect("first name"),
                LastName::parse("Mora").expect("last name"),
                Email::parse("ana@example.com").expect("email"),
                StoredPassword::from_stored("clave1".to_string()),
                NationalId::parse("1710034065").expect("cedula"),
                Phone::parse("0991234567").expect("phone"),
                RecordId::from_millis(1),
            ),
        )
        .expect("seed account");
    }

    #[test]
    fn scans_are_exact_and_case_sensitive() {
        let store = MemoryStore::new();
        seed(&store);

        let same = Email::parse("ana@example.com").expect("email");
        let cased = Email::parse("Ana@example.com").expect("email");
        let other = Email::parse("no@example.com").expect("email");
        assert!(email_taken(&store, &same).expect("scan"));
        assert!(!email_taken(&store, &cased).expect("scan"));
        assert!(!email_taken(&store, &other).expect("scan"));

        let taken = NationalId::parse("1710034065").expect("cedula");
        let free = NationalId::parse("0912345675").expect("cedula");
        assert!(national_id_taken(&store, &taken).expect("scan"));
        assert!(!national_id_taken(&store, &free).expect("scan"));
    }
}
