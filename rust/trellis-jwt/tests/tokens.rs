use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use testresult::TestResult;
use trellis_jwt::{
    Account, Activation, Claims, Export, ExportType, Generic, JwtError, Permission, Permissions,
    User, decode, format_user_credentials, parse_user_credentials,
};
use trellis_nkeys::{KeyClass, KeyPair};

fn signer(class: KeyClass, seed: u8) -> KeyPair {
    KeyPair::from_raw_seed(class, &[seed; 32])
}

#[test]
fn it_recovers_account_claims_from_a_token() -> TestResult {
    let operator = signer(KeyClass::Operator, 1);
    let account = signer(KeyClass::Account, 2);

    let mut payload = Account::default();
    payload.exports.push(Export {
        name: "orders".into(),
        subject: "orders.>".into(),
        kind: ExportType::Stream,
        token_req: true,
        revocations: Default::default(),
        response_type: None,
        response_threshold: None,
        service_latency: None,
        account_token_position: None,
        advertise: false,
        description: String::new(),
        info_url: String::new(),
    });
    payload.limits.account.conn = 25;
    payload.signing_keys.insert(signer(KeyClass::Account, 3).public_key().to_string());

    let claims = Claims::new(account.public_key().to_string(), payload)
        .named("shop")
        .issued_at(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap());
    let token = claims.sign(&operator)?;
    let decoded = decode::<Account>(token.as_str())?;

    assert_eq!(decoded.sub, claims.sub);
    assert_eq!(decoded.iss, operator.public_key().to_string());
    assert_eq!(decoded.name, "shop");
    assert_eq!(decoded.iat, 1_709_251_200);
    assert_eq!(decoded.nats, claims.nats);
    Ok(())
}

#[test]
fn it_produces_identical_tokens_for_identical_claims() -> TestResult {
    let account = signer(KeyClass::Account, 4);
    let build = || {
        Claims::new(
            signer(KeyClass::User, 5).public_key().to_string(),
            User {
                permissions: Permissions {
                    publish: Permission {
                        allow: vec!["orders.*".into()],
                        deny: vec!["orders.secret".into()],
                    },
                    ..Default::default()
                },
                issuer_account: account.public_key().to_string(),
                ..Default::default()
            },
        )
        .issued_at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    };

    assert_eq!(build().sign(&account)?, build().sign(&account)?);
    Ok(())
}

#[test]
fn it_carries_activation_windows_as_unix_seconds() -> TestResult {
    let exporter = signer(KeyClass::Account, 6);
    let importer = signer(KeyClass::Account, 7);
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let expiry = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

    let token = Claims::new(
        importer.public_key().to_string(),
        Activation {
            subject: "billing.invoices".into(),
            kind: ExportType::Service,
            issuer_account: exporter.public_key().to_string(),
        },
    )
    .valid_between(Some(start), Some(expiry))
    .sign(&exporter)?;

    let claims = token.decode::<Activation>()?;
    assert_eq!(claims.nbf, Some(1_704_067_200));
    assert_eq!(claims.exp, Some(1_706_745_600));
    assert_eq!(claims.nats.subject, "billing.invoices");
    Ok(())
}

#[test]
fn it_signs_revocations_as_generic_claims() -> TestResult {
    let operator = signer(KeyClass::Operator, 8);
    let revoked = signer(KeyClass::Account, 9).public_key().to_string();

    let token = Claims::new(
        operator.public_key().to_string(),
        Generic::default().with("accounts", vec![revoked.clone()]),
    )
    .sign(&operator)?;

    let claims = decode::<Generic>(token.as_str())?;
    assert_eq!(
        claims.nats.get("accounts"),
        Some(&serde_json::json!([revoked]))
    );
    Ok(())
}

#[test]
fn it_refuses_user_keys_as_issuers() -> TestResult {
    let user = signer(KeyClass::User, 10);
    let result = Claims::new("UNOBODY", User::default()).sign(&user);
    assert!(matches!(
        result,
        Err(JwtError::Unauthorized {
            class: KeyClass::User,
            ..
        })
    ));
    Ok(())
}

#[test]
fn it_bundles_tokens_and_seeds_for_clients() -> TestResult {
    let account = signer(KeyClass::Account, 11);
    let user = signer(KeyClass::User, 12);
    let token = Claims::new(user.public_key().to_string(), User::default()).sign(&account)?;

    let document = format_user_credentials(token.as_str(), &user.seed());
    let parsed = parse_user_credentials(&document)?;

    assert_eq!(parsed.jwt, token.as_str());
    assert_eq!(KeyPair::from_seed(&parsed.seed)?, user);
    Ok(())
}
