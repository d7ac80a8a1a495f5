//! # Registration Flows
//!
//! ## Flow Tested:
//!
//! 1. **Build**: registration request → data and operation outputs
//! 2. **Pending**: the transaction sits in the pool; a second registration
//!    of the same path is refused
//! 3. **Confirm**: mining indexes the entry; the path is now taken on chain
//! 4. **Read back**: decode, projection and originating-transaction lookup
//! 5. **Update**: a modify transaction spends the prior operation output
//! 6. **Expire**: the entry expires exactly when the tip's median time
//!    reaches its expiry

#[cfg(test)]
mod tests {
    use bdap_registry::domain::operation::spends_previous_operation;
    use bdap_registry::{
        build_entry_operation_script, BdapApi, BdapError, BdapOp, ConflictError, EntryDirectory,
        RegistrationOutputs,
    };
    use shared_crypto::{reversed_hex, Secp256k1KeyPair};
    use shared_types::{OutPoint, Script};

    use crate::fixtures::{
        assemble, init_tracing, mine, mine_at, new_service, register, registration_request,
        BLOCK_SPACING, GENESIS_MEDIAN_TIME,
    };

    const ALICE: &str = "alice@public.test.bdap";

    #[test]
    fn test_registration_pending_then_confirmed() {
        init_tracing();
        let service = new_service();
        let key = Secp256k1KeyPair::generate();

        // Height 1 so the confirming block has a predecessor.
        mine(service.chain(), vec![]);

        let (tx, built) = register(&service, "Alice", &key).unwrap();
        assert_eq!(built.entry.full_path(), ALICE);
        service.chain().add_pending(tx.clone());

        // Pending: same path refused, other paths fine.
        assert_eq!(
            service.check_conflict(ALICE),
            Err(BdapError::Conflict(ConflictError::InPendingPool {
                full_path: ALICE.to_string()
            }))
        );
        let err = register(&service, "alice", &key).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BdapError>(),
            Some(BdapError::Conflict(ConflictError::InPendingPool { .. }))
        ));
        assert!(service.check_conflict("bob@public.test.bdap").is_ok());

        // Confirm.
        let tip = mine(service.chain(), vec![tx.clone()]);
        assert_eq!(tip.height, 2);
        assert_eq!(service.chain().pending_len(), 0);
        assert!(service.check_conflict(ALICE).is_ok());

        let stored = service
            .chain()
            .entry(ALICE)
            .unwrap()
            .expect("entry indexed on confirmation");
        assert_eq!(stored.height, 2);
        assert_eq!(stored.txid, tx.txid());

        let request = registration_request(service.config(), "alice", &key);
        assert!(matches!(
            service.build_registration(&request),
            Err(BdapError::Conflict(ConflictError::AlreadyRegistered { .. }))
        ));

        // Read back.
        let decoded = service.decode_transaction(&tx).unwrap();
        assert_eq!(decoded.entry.full_path(), ALICE);
        assert_eq!(decoded.entry.encrypt_public_key, stored.encrypt_public_key);
        assert_eq!(service.originating_transaction(&stored).unwrap(), Some(tx.clone()));

        let projection = service.entry_projection(&stored, false).unwrap();
        assert_eq!(projection["object_full_path"], ALICE);
        assert_eq!(projection["txid"], reversed_hex(&tx.txid()));
        assert_eq!(projection["time"], GENESIS_MEDIAN_TIME + BLOCK_SPACING);
        assert_eq!(projection["height"], 2);
        assert_eq!(projection["expired"], false);

        let abridged = service.entry_projection(&stored, true).unwrap();
        assert_eq!(abridged.len(), 3);
        assert_eq!(abridged["common_name"], "Alice (test)");
    }

    #[test]
    fn test_update_spends_prior_operation_output() {
        init_tracing();
        let service = new_service();
        let key = Secp256k1KeyPair::generate();

        let (tx, built) = register(&service, "alice", &key).unwrap();
        mine(service.chain(), vec![tx.clone()]);
        let stored = service.chain().entry(ALICE).unwrap().unwrap();

        let prior = OutPoint::new(stored.txid, 1);
        let modify = RegistrationOutputs {
            operation_script: build_entry_operation_script(
                BdapOp::Modify,
                ALICE.as_bytes(),
                &stored.encrypt_public_key,
                stored.expire_time,
                &Script::p2pkh(&[0x11; 20]),
            ),
            ..built
        };
        let update = assemble(&modify, Some(prior));

        assert!(spends_previous_operation(&update, &stored.txid));
        assert!(!spends_previous_operation(&tx, &stored.txid));

        let (outpoint, tag) = service.find_operation_in_inputs(&update).unwrap().unwrap();
        assert_eq!(outpoint, prior);
        assert_eq!(tag.op, BdapOp::New);
        assert_eq!(tag.full_path().as_deref(), Some(ALICE));

        let decoded = service.decode_transaction(&update).unwrap();
        assert_eq!(decoded.operation.op, BdapOp::Modify);
    }

    #[test]
    fn test_expiration_boundary() {
        init_tracing();
        let service = new_service();
        let key = Secp256k1KeyPair::generate();

        let mut request = registration_request(service.config(), "alice", &key);
        request.registration_days = Some(1);
        let built = service.build_registration(&request).unwrap();
        let expire = built.entry.expire_time;
        assert_eq!(expire, GENESIS_MEDIAN_TIME + 86_400 + 28_800);

        mine_at(service.chain(), expire - 1, vec![assemble(&built, None)]);
        let stored = service.chain().entry(ALICE).unwrap().unwrap();
        assert_eq!(service.is_expired(&stored), Ok(false));

        mine_at(service.chain(), expire, vec![]);
        assert_eq!(service.is_expired(&stored), Ok(true));
        assert_eq!(service.entry_projection(&stored, false).unwrap()["expired"], true);
    }

    #[test]
    fn test_expiry_overflow_refused() {
        let service = new_service();
        let key = Secp256k1KeyPair::generate();
        let mut request = registration_request(service.config(), "alice", &key);
        request.registration_days = Some(u64::MAX / 86_400);

        assert!(matches!(
            service.build_registration(&request),
            Err(BdapError::ExpiryOverflow { .. })
        ));
    }
}
