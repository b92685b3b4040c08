mod common;

use petshop_backend::{
    common::{error::AppError, i18n::MessageKey},
    models::{
        auth::{Principal, Role},
        petshop::{CreatePetshopPayload, ResponsiblePersonPayload, UpdateConfigurationPayload, UpdatePetshopPayload},
    },
    services::{configuration_service, notification::EmailFlavor, petshop_service::demo_client_email, responsible_person_service},
};
use serde_json::json;
use uuid::Uuid;

use common::{Harness, RecordingNotifier, petshop_json, petshop_principal};

fn create_payload(email: &str) -> CreatePetshopPayload {
    serde_json::from_value(petshop_json(email)).unwrap()
}

fn responsible(name: &str) -> ResponsiblePersonPayload {
    serde_json::from_value(json!({ "name": name, "phoneNumber": "11977776666", "cpf": "12345678900" })).unwrap()
}

#[tokio::test]
async fn new_petshop_comes_with_default_configuration_and_demo_client() {
    let h = Harness::new();

    let created = h.state.petshop_service.create_petshop(h.store(), create_payload("loja@petmail.com")).await.unwrap();

    assert_eq!(created.user.role(), Some(Role::Petshop));
    assert_eq!(created.user.terms_version, "v1");
    assert_eq!(created.user.password, "hash:senha-forte");
    let json = serde_json::to_value(&created).unwrap();
    assert!(json["user"].get("password").is_none());

    assert_eq!(created.address.petshop_id, None);
    assert_eq!(created.address.delivery_value, None);
    assert_eq!(created.address.delivery_time, None);

    let config = &created.petshop_configuration;
    assert!(config.payment_outside_app);
    assert!(!config.payment_through_app);
    assert_eq!(config.cancellation_fee, 0);

    assert_eq!(created.client_list.len(), 1);
    let demo = &created.client_list[0];
    assert_eq!(demo.user.name, "Cliente Teste");
    assert_eq!(demo.user.email, "loja+petmail.com@clienteteste.com.br");
    assert_eq!(demo.pets.len(), 1);
    assert_eq!(demo.pets[0].name, "Rex");
    assert_eq!(demo.pets[0].petshop_id, created.user.id);

    let demo_address = demo.client_address.as_ref().unwrap();
    assert_eq!(demo_address.petshop_id, Some(created.user.id));
    assert_eq!(demo_address.street, created.address.street);
    assert_eq!(demo_address.delivery_value, Some(2000));
    assert_eq!(demo_address.delivery_time, Some(10));

    let tables = h.store.snapshot().await;
    assert_eq!(tables.users.len(), 2);
    assert_eq!(tables.configurations.len(), 1);
    assert_eq!(tables.client_relations.len(), 1);
}

#[tokio::test]
async fn welcome_email_and_free_trial_run_after_commit() {
    let h = Harness::new();

    let created = h.state.petshop_service.create_petshop(h.store(), create_payload("loja@petmail.com")).await.unwrap();

    let emails = h.notifier.wait_for_emails(1).await;
    assert_eq!(emails.len(), 1);
    assert_eq!(emails[0].flavor, EmailFlavor::Petshop);
    assert_eq!(emails[0].email, "loja@petmail.com");
    assert_eq!(*h.notifier.free_trials.lock().await, vec![created.user.id]);
}

#[tokio::test]
async fn failing_notifications_never_undo_the_signup() {
    let h = Harness::with_notifier(RecordingNotifier::failing());

    let created = h.state.petshop_service.create_petshop(h.store(), create_payload("loja@petmail.com")).await.unwrap();

    // o e-mail ainda é tentado mesmo com o teste grátis falhando
    assert_eq!(h.notifier.wait_for_emails(1).await.len(), 1);
    let tables = h.store.snapshot().await;
    assert!(tables.users.iter().any(|u| u.id == created.user.id));
}

#[tokio::test]
async fn duplicate_petshop_email_is_a_unique_violation() {
    let h = Harness::new();
    h.state.petshop_service.create_petshop(h.store(), create_payload("loja@petmail.com")).await.unwrap();

    let err = h
        .state
        .petshop_service
        .create_petshop(h.store(), create_payload("loja@petmail.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::UniqueViolation(_)));
    assert_eq!(err.status().as_u16(), 409);
    assert_eq!(h.store.snapshot().await.users.len(), 2);
}

#[tokio::test]
async fn every_petshop_gets_its_own_demo_client() {
    let h = Harness::new();
    let mut first = petshop_json("loja@petmail.com");
    first["user"]["phoneNumber"] = json!("11911110000");
    let mut second = petshop_json("loja@pets.com");
    second["user"]["phoneNumber"] = json!("11922220000");

    let first = h
        .state
        .petshop_service
        .create_petshop(h.store(), serde_json::from_value(first).unwrap())
        .await
        .unwrap();
    let second = h
        .state
        .petshop_service
        .create_petshop(h.store(), serde_json::from_value(second).unwrap())
        .await
        .unwrap();

    let first_demo = &first.client_list[0];
    let second_demo = &second.client_list[0];
    assert_ne!(first_demo.user.id, second_demo.user.id);
    assert!(!second_demo.already_exists);
    assert_eq!(second_demo.user.phone_number.as_deref(), Some("11922220000"));

    let listed = h
        .state
        .client_service
        .list_clients(h.store(), &petshop_principal(&second.user), None)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].user.id, second_demo.user.id);
}

#[tokio::test]
async fn demo_client_failure_aborts_the_signup() {
    let h = Harness::new();
    h.seed_user(&demo_client_email("loja@petmail.com"), Role::Worker).await;

    let err = h
        .state
        .petshop_service
        .create_petshop(h.store(), create_payload("loja@petmail.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BadRequest { key: MessageKey::EmailInUse, .. }));
    let tables = h.store.snapshot().await;
    assert_eq!(tables.users.len(), 1);
    assert!(tables.addresses.is_empty());
    assert!(tables.configurations.is_empty());
    assert!(tables.client_relations.is_empty());
    assert!(h.notifier.emails.lock().await.is_empty());
}

#[tokio::test]
async fn signup_hashes_passwords_before_opening_the_transaction() {
    let h = Harness::with_lock_checking_hasher();

    let created = h.state.petshop_service.create_petshop(h.store(), create_payload("loja@petmail.com")).await.unwrap();

    assert_eq!(created.user.password, "hash:senha-forte");
    assert!(created.client_list[0].user.password.starts_with("hash:"));
}

#[tokio::test]
async fn update_keeps_email_and_cnpj() {
    let h = Harness::new();
    let created = h.state.petshop_service.create_petshop(h.store(), create_payload("loja@petmail.com")).await.unwrap();
    let principal = petshop_principal(&created.user);

    let payload: UpdatePetshopPayload = serde_json::from_value(json!({
        "user": { "email": "nova@petmail.com", "name": "Pet Feliz II", "cnpj": "000" },
        "address": { "city": "Campinas" }
    }))
    .unwrap();

    let updated = h.state.petshop_service.update_petshop(h.store(), &principal, payload).await.unwrap();

    assert_eq!(updated.user.name, "Pet Feliz II");
    assert_eq!(updated.user.email, "loja@petmail.com");
    assert_eq!(updated.user.cnpj, created.user.cnpj);
    assert_eq!(updated.user.phone_number, created.user.phone_number);
    assert_eq!(updated.address.id, created.address.id);
    assert_eq!(updated.address.city, "Campinas");
    assert_eq!(updated.address.street, created.address.street);
    assert!(updated.address.updated_at > created.address.updated_at);
    assert_eq!(updated.address.created_at, created.address.created_at);
}

#[tokio::test]
async fn petshop_without_address_cannot_be_updated() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;

    let err = h
        .state
        .petshop_service
        .update_petshop(h.store(), &petshop_principal(&petshop), UpdatePetshopPayload::default())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound { key: MessageKey::UserOrAddressNotFound, .. }));
}

#[tokio::test]
async fn public_list_and_service_lookup() {
    let h = Harness::new();
    let created = h.state.petshop_service.create_petshop(h.store(), create_payload("loja@petmail.com")).await.unwrap();

    let list = h.state.petshop_service.list_petshops(h.store()).await.unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, created.user.id);
    assert_eq!(list[0].address.as_ref().unwrap().city, "São Paulo");

    let graph = h
        .state
        .petshop_service
        .micro_get_petshop(h.store(), &Principal::service(Uuid::new_v4()), created.user.id)
        .await
        .unwrap();
    assert_eq!(graph.address.unwrap().len(), 1);
    assert!(graph.petshop_configuration.unwrap().is_some());
    assert!(graph.responsible_person.unwrap().is_none());

    let err = h
        .state
        .petshop_service
        .micro_get_petshop(h.store(), &petshop_principal(&created.user), created.user.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));
}

#[tokio::test]
async fn configuration_is_created_once_by_services_and_edited_by_the_petshop() {
    let h = Harness::new();
    let petshop = h.seed_user("loja@petmail.com", Role::Petshop).await;
    let service = Principal::service(Uuid::new_v4());

    let err = configuration_service::create_configuration(h.store(), &petshop_principal(&petshop), petshop.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { .. }));

    configuration_service::create_configuration(h.store(), &service, petshop.id).await.unwrap();
    let err = configuration_service::create_configuration(h.store(), &service, petshop.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict { key: MessageKey::ConfigurationAlreadyExists, .. }));

    let payload: UpdateConfigurationPayload = serde_json::from_value(json!({
        "paymentThroughApp": true,
        "paymentOutsideApp": false,
        "cancellationFee": 1500
    }))
    .unwrap();
    let updated = configuration_service::update_configuration(h.store(), &petshop_principal(&petshop), payload)
        .await
        .unwrap();
    assert!(updated.payment_through_app);
    assert!(!updated.schedule_through_app_cancel_if_not_payed);

    let client = Principal::user(Uuid::new_v4(), Role::UnconfirmedClient);
    let view = configuration_service::client_get_configuration(h.store(), &client, petshop.id).await.unwrap();
    assert_eq!(view.cancellation_fee, 1500);
    assert!(!view.payment_outside_app);

    let err = configuration_service::micro_get_configuration(h.store(), &service, Uuid::new_v4())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { key: MessageKey::ConfigurationNotFound, .. }));
}

#[tokio::test]
async fn one_responsible_person_per_petshop() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;
    let principal = petshop_principal(&petshop);

    let err = responsible_person_service::get_responsible_person(h.store(), &principal).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound { key: MessageKey::ResponsiblePersonNotFound, .. }));

    responsible_person_service::create_responsible_person(h.store(), &principal, responsible("Ana Lima"))
        .await
        .unwrap();
    let err = responsible_person_service::create_responsible_person(h.store(), &principal, responsible("Outra"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict { key: MessageKey::ResponsiblePersonAlreadyExists, .. }));

    let updated = responsible_person_service::update_responsible_person(h.store(), &principal, responsible("Ana Souza"))
        .await
        .unwrap();
    assert_eq!(updated.name, "Ana Souza");

    let with_petshop = responsible_person_service::get_responsible_person(h.store(), &principal).await.unwrap();
    assert_eq!(with_petshop.petshop.id, petshop.id);
    assert_eq!(with_petshop.responsible_person.id, updated.id);

    let worker = h.seed_worker("joao@petmail.com", petshop.id).await;
    let concise = responsible_person_service::worker_get_concise_responsible_person(
        h.store(),
        &Principal::user(worker.id, Role::Worker),
        None,
    )
    .await
    .unwrap();
    assert_eq!(concise.name, "Ana Souza");

    let err = responsible_person_service::worker_get_concise_responsible_person(
        h.store(),
        &Principal::user(worker.id, Role::Worker),
        Some(Uuid::new_v4()),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden { key: MessageKey::WorkerNotAtPetshop, .. }));
}
