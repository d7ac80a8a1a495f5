//! # Audit Trail Flows
//!
//! An owner registers, then publishes signed audits of document hashes.
//! Audits are read back from their transactions, checked against the
//! owner's key and projected.

#[cfg(test)]
mod tests {
    use bdap_registry::{Audit, AuditAcceptance, AuditData, AuditRejection, BdapApi, EntryDirectory};
    use shared_crypto::{hash256_hex, Secp256k1KeyPair};
    use shared_types::Script;

    use crate::fixtures::{audit_tx, init_tracing, mine, new_service, register, TestService};

    const OWNER: &str = "carol@public.test.bdap";

    fn registered_owner(service: &TestService) -> Secp256k1KeyPair {
        let key = Secp256k1KeyPair::generate();
        let (tx, _) = register(service, "carol", &key).unwrap();
        mine(service.chain(), vec![tx]);
        key
    }

    fn document_audit(documents: &[&str], timestamp: u64) -> Audit {
        let hashes = documents
            .iter()
            .map(|doc| hash256_hex(doc.as_bytes()).into_bytes())
            .collect();
        Audit::from_data(&AuditData::new(hashes, timestamp), OWNER)
    }

    #[test]
    fn test_signed_audit_round_trip() {
        init_tracing();
        let service = new_service();
        let key = registered_owner(&service);
        assert!(service.chain().entry(OWNER).unwrap().is_some());

        let mut audit = document_audit(&["contract.pdf", "invoice.pdf"], 1_600_000_500);
        audit.sign(&key).unwrap();

        let tx = audit_tx(&audit, &Script::p2pkh(&[0x11; 20]));
        let read_back = service.decode_audit_transaction(&tx).unwrap();
        assert_eq!(read_back, audit);
        assert_eq!(read_back.version(), Some(1));
        assert_eq!(service.accept_audit(&read_back).unwrap(), AuditAcceptance::Accepted);

        let projection = service.audit_projection(&read_back).unwrap();
        assert_eq!(projection["audit_count"], 2);
        assert_eq!(projection["owner"], OWNER);
        assert_eq!(projection["signed"], true);

        // Mining the audit must not create a directory entry for it.
        mine(service.chain(), vec![tx]);
        assert!(service.chain().entry(OWNER).unwrap().is_some());
    }

    #[test]
    fn test_unsigned_audit_accepted_for_known_owner() {
        let service = new_service();
        registered_owner(&service);

        let audit = document_audit(&["notes.txt"], 1);
        assert!(!audit.is_signed());
        assert_eq!(service.accept_audit(&audit).unwrap(), AuditAcceptance::Accepted);
    }

    #[test]
    fn test_audit_for_unknown_owner_is_orphaned() {
        init_tracing();
        let service = new_service();
        let stranger = Secp256k1KeyPair::generate();

        let mut audit = document_audit(&["notes.txt"], 1);
        audit.sign(&stranger).unwrap();
        assert_eq!(service.accept_audit(&audit).unwrap(), AuditAcceptance::Orphaned);
    }

    #[test]
    fn test_batch_verification_matches_single() {
        let service = new_service();
        let key = registered_owner(&service);
        let impostor = Secp256k1KeyPair::generate();

        let audits: Vec<Audit> = (0u64..16)
            .map(|i| {
                let mut audit = document_audit(&[i.to_string().as_str()], i);
                let signer = if i % 3 == 0 { &impostor } else { &key };
                audit.sign(signer).unwrap();
                audit
            })
            .collect();

        let batch = service.verify_audits(&audits).unwrap();
        for (i, (audit, ok)) in audits.iter().zip(&batch).enumerate() {
            assert_eq!(*ok, i % 3 != 0, "audit {i}");
            let expected = if *ok {
                AuditAcceptance::Accepted
            } else {
                AuditAcceptance::Rejected(AuditRejection::BadSignature)
            };
            assert_eq!(service.accept_audit(audit).unwrap(), expected);
        }
    }

    #[test]
    fn test_audit_display() {
        let audit = document_audit(&["a"], 42);
        let text = audit.to_string();
        assert!(text.contains("audit count   = 1"));
        assert!(text.contains("timestamp     = 42"));
        assert!(text.contains(OWNER));
        assert!(text.contains("signed        = False"));
        assert_eq!(hex::encode(audit.signing_digest()).len(), 64);
    }
}
