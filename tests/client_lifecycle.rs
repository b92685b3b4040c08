mod common;

use petshop_backend::{
    common::{error::AppError, i18n::MessageKey},
    db::Store,
    models::{
        auth::{Principal, Role},
        client::{ClientPayload, ClientSelfUpdatePayload, ScheduledClientCheckPayload},
        relation::RelationFilter,
    },
    services::notification::EmailFlavor,
};
use serde_json::json;
use uuid::Uuid;

use common::{Harness, RecordingNotifier, client_json, client_payload, petshop_principal};

#[tokio::test]
async fn placeholder_password_is_hashed_outside_the_transaction() {
    let h = Harness::with_lock_checking_hasher();
    let petshop = h.seed_petshop("loja@petmail.com").await;

    let created = h
        .state
        .client_service
        .create_client(h.store(), &petshop_principal(&petshop), client_payload("maria@gmail.com"))
        .await
        .unwrap();

    assert_eq!(created.user.password.len(), "hash:".len() + 32);
}

#[tokio::test]
async fn create_client_commits_relation_info_and_tenant_pets_even_if_email_fails() {
    let h = Harness::with_notifier(RecordingNotifier::failing());
    let petshop = h.seed_petshop("loja@petmail.com").await;

    let created = h
        .state
        .client_service
        .create_client(h.store(), &petshop_principal(&petshop), client_payload("maria@gmail.com"))
        .await
        .unwrap();

    assert!(!created.already_exists);
    assert_eq!(created.user.role(), Some(Role::UnconfirmedClient));
    assert_eq!(created.user.terms_version, "v0");

    // o e-mail falha, mas nada é desfeito
    assert_eq!(h.notifier.wait_for_emails(1).await.len(), 1);

    let tables = h.store.snapshot().await;
    let relations: Vec<_> = tables.client_relations.iter().filter(|r| r.client_id == created.user.id).collect();
    assert_eq!(relations.len(), 1);
    assert_eq!(relations[0].petshop_id, petshop.id);
    assert!(!relations[0].is_removed);

    assert_eq!(tables.client_infos.iter().filter(|i| i.client_id == created.user.id).count(), 1);

    let pets: Vec<_> = tables.pets.iter().filter(|p| p.client_id == created.user.id).collect();
    assert_eq!(pets.len(), 2);
    assert!(pets.iter().all(|p| p.petshop_id == petshop.id));

    let address = created.client_address.expect("endereço do cliente");
    assert_eq!(address.petshop_id, Some(petshop.id));
    assert_eq!(address.delivery_value, Some(1500));
}

#[tokio::test]
async fn client_email_carries_the_petshop_name() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;

    h.state
        .client_service
        .create_client(h.store(), &petshop_principal(&petshop), client_payload("maria@gmail.com"))
        .await
        .unwrap();

    let emails = h.notifier.wait_for_emails(1).await;
    assert_eq!(emails[0].email, "maria@gmail.com");
    assert_eq!(emails[0].flavor, EmailFlavor::Client);
    assert_eq!(emails[0].petshop_name.as_deref(), Some(petshop.name.as_str()));
}

#[tokio::test]
async fn adding_the_same_client_twice_is_a_conflict() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;
    let principal = petshop_principal(&petshop);

    h.state
        .client_service
        .create_client(h.store(), &principal, client_payload("maria@gmail.com"))
        .await
        .unwrap();
    let users_before = h.store.snapshot().await.users.len();

    let err = h
        .state
        .client_service
        .create_client(h.store(), &principal, client_payload("maria@gmail.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict { key: MessageKey::ClientAlreadyAdded, .. }));
    let tables = h.store.snapshot().await;
    assert_eq!(tables.users.len(), users_before);
    assert_eq!(tables.client_relations.len(), 1);
    assert_eq!(tables.pets.len(), 2);
}

#[tokio::test]
async fn petshop_email_cannot_become_a_client() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;
    h.seed_petshop("outra@petmail.com").await;

    let err = h
        .state
        .client_service
        .create_client(h.store(), &petshop_principal(&petshop), client_payload("outra@petmail.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::BadRequest { key: MessageKey::EmailInUse, .. }));
    assert_eq!(err.status().as_u16(), 400);

    let tables = h.store.snapshot().await;
    assert!(tables.client_relations.is_empty());
    assert!(tables.client_infos.is_empty());
    assert!(tables.pets.is_empty());
    assert!(tables.addresses.is_empty());
}

#[tokio::test]
async fn only_petshops_create_clients() {
    let h = Harness::new();
    let worker = Principal::user(Uuid::new_v4(), Role::Worker);

    let err = h
        .state
        .client_service
        .create_client(h.store(), &worker, client_payload("maria@gmail.com"))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden { .. }));
    assert!(h.store.snapshot().await.users.is_empty());
}

#[tokio::test]
async fn pets_stay_isolated_per_petshop() {
    let h = Harness::new();
    let first = h.seed_petshop("primeira@petmail.com").await;
    let second = h.seed_petshop("segunda@petmail.com").await;

    let created_first = h
        .state
        .client_service
        .create_client(h.store(), &petshop_principal(&first), client_payload("maria@gmail.com"))
        .await
        .unwrap();

    let mut payload = client_json("maria@gmail.com");
    payload["pets"] = json!([{ "name": "Thor", "bodySize": "large", "furSize": "long" }]);
    let payload: ClientPayload = serde_json::from_value(payload).unwrap();

    let created_second = h
        .state
        .client_service
        .create_client(h.store(), &petshop_principal(&second), payload)
        .await
        .unwrap();

    assert!(created_second.already_exists);
    assert_eq!(created_second.user.id, created_first.user.id);

    let service = Principal::service(Uuid::new_v4());
    let seen_by_second = h
        .state
        .client_service
        .micro_get_client_petshop(h.store(), &service, created_first.user.id, second.id)
        .await
        .unwrap();

    let pets = seen_by_second.pets.unwrap();
    assert_eq!(pets.len(), 1);
    assert_eq!(pets[0].name, "Thor");

    let listed_by_first = h
        .state
        .client_service
        .list_clients(h.store(), &petshop_principal(&first), None)
        .await
        .unwrap();
    assert_eq!(listed_by_first.len(), 1);
    let names: Vec<_> = listed_by_first[0].pets.as_ref().unwrap().iter().map(|p| p.name.clone()).collect();
    assert_eq!(names, vec!["Rex".to_string(), "Mia".to_string()]);
}

#[tokio::test]
async fn removed_relation_is_reactivated_instead_of_duplicated() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;
    let principal = petshop_principal(&petshop);

    let created = h
        .state
        .client_service
        .create_client(h.store(), &principal, client_payload("maria@gmail.com"))
        .await
        .unwrap();

    {
        let mut uow = h.store.begin().await.unwrap();
        uow.set_client_relation_removed(created.client_petshop_relation.id, true).await.unwrap();
        uow.commit().await.unwrap();
    }

    let again = h
        .state
        .client_service
        .create_client(h.store(), &principal, client_payload("maria@gmail.com"))
        .await
        .unwrap();

    assert!(again.already_exists);
    assert_eq!(again.client_petshop_relation.id, created.client_petshop_relation.id);
    assert!(!again.client_petshop_relation.is_removed);

    let tables = h.store.snapshot().await;
    assert_eq!(tables.client_relations.len(), 1);
    assert_eq!(tables.client_infos.len(), 1);
    assert_eq!(tables.addresses.len(), 1);
}

#[tokio::test]
async fn client_address_without_delivery_pricing_is_rejected() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;

    let mut payload = client_json("maria@gmail.com");
    payload["address"]["deliveryTime"] = json!(null);
    let payload: ClientPayload = serde_json::from_value(payload).unwrap();

    let err = h
        .state
        .client_service
        .create_client(h.store(), &petshop_principal(&petshop), payload)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::ValidationError(_)));
    assert!(h.store.snapshot().await.client_relations.is_empty());
}

#[tokio::test]
async fn unknown_pet_in_update_rolls_back_everything() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;
    let principal = petshop_principal(&petshop);

    let created = h
        .state
        .client_service
        .create_client(h.store(), &principal, client_payload("maria@gmail.com"))
        .await
        .unwrap();
    let before = h.store.snapshot().await;

    let mut payload = client_json("maria@gmail.com");
    payload["user"]["name"] = json!("Maria Alterada");
    payload["address"]["id"] = json!(created.client_address.as_ref().unwrap().id);
    payload["pets"] = json!([
        { "name": "Novo", "bodySize": "small", "furSize": "short" },
        { "id": Uuid::new_v4(), "name": "Fantasma", "bodySize": "small", "furSize": "short" }
    ]);
    let payload: ClientPayload = serde_json::from_value(payload).unwrap();

    let err = h
        .state
        .client_service
        .update_client(h.store(), &principal, created.user.id, payload)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::NotFound { key: MessageKey::PetNotFound, .. }));

    let after = h.store.snapshot().await;
    assert_eq!(after.users, before.users);
    assert_eq!(after.pets, before.pets);
    assert_eq!(after.addresses, before.addresses);
}

#[tokio::test]
async fn update_client_patches_owned_pets_and_address() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;
    let principal = petshop_principal(&petshop);

    let created = h
        .state
        .client_service
        .create_client(h.store(), &principal, client_payload("maria@gmail.com"))
        .await
        .unwrap();
    let rex = created.pets.iter().find(|p| p.name == "Rex").unwrap().clone();

    let mut payload = client_json("maria@gmail.com");
    payload["address"]["id"] = json!(created.client_address.as_ref().unwrap().id);
    payload["address"]["deliveryValue"] = json!(2500);
    payload["pets"] = json!([{ "id": rex.id, "name": "Rex", "bodySize": "large", "furSize": "short" }]);
    let payload: ClientPayload = serde_json::from_value(payload).unwrap();

    let updated = h
        .state
        .client_service
        .update_client(h.store(), &principal, created.user.id, payload)
        .await
        .unwrap();

    assert_eq!(updated.client_address.unwrap().delivery_value, Some(2500));
    assert_eq!(updated.pets.len(), 1);
    assert_eq!(updated.pets[0].id, rex.id);
    assert_ne!(updated.pets[0].body_size, rex.body_size);
    // Mia continua lá
    assert_eq!(h.store.snapshot().await.pets.len(), 2);
}

#[tokio::test]
async fn update_client_rejects_someone_elses_address() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;
    let principal = petshop_principal(&petshop);

    let created = h
        .state
        .client_service
        .create_client(h.store(), &principal, client_payload("maria@gmail.com"))
        .await
        .unwrap();

    let mut payload = client_json("maria@gmail.com");
    payload["address"]["id"] = json!(Uuid::new_v4());
    let payload: ClientPayload = serde_json::from_value(payload).unwrap();

    let err = h
        .state
        .client_service
        .update_client(h.store(), &principal, created.user.id, payload)
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden { key: MessageKey::AddressNotOwned, .. }));
}

#[tokio::test]
async fn clients_of_another_petshop_are_not_found() {
    let h = Harness::new();
    let owner = h.seed_petshop("dona@petmail.com").await;
    let stranger = h.seed_petshop("estranha@petmail.com").await;

    let created = h
        .state
        .client_service
        .create_client(h.store(), &petshop_principal(&owner), client_payload("maria@gmail.com"))
        .await
        .unwrap();

    let err = h
        .state
        .client_service
        .update_client(h.store(), &petshop_principal(&stranger), created.user.id, client_payload("maria@gmail.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { key: MessageKey::ClientNotFound, .. }));

    let err = h
        .state
        .client_service
        .update_client_cpf(
            h.store(),
            &petshop_principal(&stranger),
            created.user.id,
            serde_json::from_value(json!({ "cpf": "12345678900" })).unwrap(),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { .. }));
}

#[tokio::test]
async fn partial_self_update_keeps_other_fields() {
    let h = Harness::new();
    let client = h.seed_user("maria@gmail.com", Role::Client).await;
    let principal = Principal::user(client.id, Role::Client);

    let payload = ClientSelfUpdatePayload { name: Some("Maria Nova".to_string()), ..Default::default() };
    let updated = h
        .state
        .client_service
        .update_client_self(h.store(), &principal, payload)
        .await
        .unwrap();

    assert_eq!(updated.name, "Maria Nova");
    assert_eq!(updated.phone_number, client.phone_number);
    assert_eq!(updated.email, client.email);
    assert_eq!(updated.created_at, client.created_at);
    assert!(updated.updated_at > client.updated_at);
}

#[tokio::test]
async fn client_sees_one_block_per_petshop_without_internal_notes() {
    let h = Harness::new();
    let first = h.seed_petshop("primeira@petmail.com").await;
    let second = h.seed_petshop("segunda@petmail.com").await;

    let created = h
        .state
        .client_service
        .create_client(h.store(), &petshop_principal(&first), client_payload("maria@gmail.com"))
        .await
        .unwrap();
    h.state
        .client_service
        .create_client(h.store(), &petshop_principal(&second), client_payload("maria@gmail.com"))
        .await
        .unwrap();

    let view = h
        .state
        .client_service
        .get_client_self(h.store(), &Principal::user(created.user.id, Role::Client))
        .await
        .unwrap();

    assert_eq!(view.petshops.len(), 2);
    for block in &view.petshops {
        assert_eq!(block.pets.len(), 2);
        assert!(block.client_address.is_some());
        assert!(block.petshop_info.is_some());
    }

    let json = serde_json::to_value(&view).unwrap();
    assert!(json["petshops"][0]["pets"][1].get("notes").is_none());
    assert!(json.get("password").is_none());
}

#[tokio::test]
async fn schedule_check_follows_the_petshop_payment_rules() {
    let h = Harness::new();
    let petshop = h.seed_petshop("loja@petmail.com").await;

    let created = h
        .state
        .client_service
        .create_client(h.store(), &petshop_principal(&petshop), client_payload("maria@gmail.com"))
        .await
        .unwrap();
    let pet_id = created.pets[0].id;
    let service = Principal::service(Uuid::new_v4());

    let check = |pay_through_app: bool, delivery_value: Option<i32>, pet_id: Uuid| ScheduledClientCheckPayload {
        client_id: created.user.id,
        pet_id,
        petshop_id: petshop.id,
        pay_through_app,
        delivery_value,
    };

    let data = h
        .state
        .client_service
        .check_scheduled_client_data(h.store(), &service, check(false, Some(1500), pet_id))
        .await
        .unwrap();
    assert_eq!(data.client.pets.as_ref().unwrap().len(), 1);
    assert_eq!(data.cancellation_fee, 0);
    assert!(!data.schedule_through_app_cancel_if_not_payed);

    // configuração padrão não aceita pagamento pelo app
    let err = h
        .state
        .client_service
        .check_scheduled_client_data(h.store(), &service, check(true, None, pet_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { key: MessageKey::PaymentThroughAppNotAllowed, .. }));

    let err = h
        .state
        .client_service
        .check_scheduled_client_data(h.store(), &service, check(false, Some(999), pet_id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { key: MessageKey::DeliveryValueMismatch, .. }));

    let err = h
        .state
        .client_service
        .check_scheduled_client_data(h.store(), &service, check(false, None, Uuid::new_v4()))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound { key: MessageKey::ClientOrPetNotFound, .. }));
}

#[tokio::test]
async fn service_sees_every_active_relation_of_a_client() {
    let h = Harness::new();
    let first = h.seed_petshop("primeira@petmail.com").await;
    let second = h.seed_petshop("segunda@petmail.com").await;

    let created = h
        .state
        .client_service
        .create_client(h.store(), &petshop_principal(&first), client_payload("maria@gmail.com"))
        .await
        .unwrap();
    h.state
        .client_service
        .create_client(h.store(), &petshop_principal(&second), client_payload("maria@gmail.com"))
        .await
        .unwrap();

    let graph = h
        .state
        .client_service
        .micro_check_client_petshops(h.store(), &Principal::service(Uuid::new_v4()), created.user.id)
        .await
        .unwrap();
    assert_eq!(graph.client_petshop_relation.unwrap().len(), 2);

    let mut uow = h.store.begin().await.unwrap();
    let active = uow
        .list_client_relations(RelationFilter::active().member(created.user.id))
        .await
        .unwrap();
    assert_eq!(active.len(), 2);
}
