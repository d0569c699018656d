mod utils;

use finance_repo::user_repo::{NewUser, UserRepoError};
use rstest::rstest;
use utils::{unique_email, RepoType};

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_create_and_get_user(#[case] repo_type: RepoType) {
    let Some((user_repo, _transaction_repo)) = utils::build_repos(repo_type).await else {
        return;
    };

    let new_user = NewUser::new(
        "Alice".to_owned(),
        unique_email(),
        "not a real hash".to_owned(),
    );
    let user = user_repo.create_user(new_user.clone()).await.unwrap();
    assert!(user.id > 0);
    assert_eq!(user.name, new_user.name);
    assert_eq!(user.email, new_user.email);
    assert_eq!(user.password_hash, new_user.password_hash);

    let stored_user = user_repo.get_user(user.id).await.unwrap();
    assert_eq!(user, stored_user);

    let by_email = user_repo.get_user_by_email(&new_user.email).await.unwrap();
    assert_eq!(user, by_email);
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_create_existing_email(#[case] repo_type: RepoType) {
    let Some((user_repo, _transaction_repo)) = utils::build_repos(repo_type).await else {
        return;
    };

    let email = unique_email();
    let first = NewUser::new("Alice".to_owned(), email.clone(), "hash".to_owned());
    let second = NewUser::new("Mallory".to_owned(), email.clone(), "other".to_owned());
    let created = user_repo.create_user(first).await.unwrap();

    let create_result = user_repo.create_user(second).await;
    assert!(matches!(
        create_result,
        Err(UserRepoError::UserAlreadyExists(e)) if e == email
    ));

    let stored = user_repo.get_user_by_email(&email).await.unwrap();
    assert_eq!(stored.id, created.id);
    assert_eq!(stored.name, "Alice");
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_email_exists(#[case] repo_type: RepoType) {
    let Some((user_repo, _transaction_repo)) = utils::build_repos(repo_type).await else {
        return;
    };

    let email = unique_email();
    assert!(!user_repo.email_exists(&email).await.unwrap());

    user_repo
        .create_user(NewUser::new("Bob".to_owned(), email.clone(), "hash".to_owned()))
        .await
        .unwrap();
    assert!(user_repo.email_exists(&email).await.unwrap());
    // uniqueness is case-sensitive
    assert!(!user_repo
        .email_exists(&email.to_uppercase())
        .await
        .unwrap());
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_get_invalid_user(#[case] repo_type: RepoType) {
    let Some((user_repo, _transaction_repo)) = utils::build_repos(repo_type).await else {
        return;
    };

    let result = user_repo.get_user(i32::MAX).await;
    assert!(matches!(result, Err(UserRepoError::UserNotFound(i32::MAX))));

    let result = user_repo.get_user_by_email(&unique_email()).await;
    assert!(matches!(result, Err(UserRepoError::EmailNotFound(_))));
}

#[rstest]
#[case::sqlx(RepoType::SQLx)]
#[case::mem(RepoType::Mem)]
#[actix_rt::test]
async fn test_ids_are_distinct(#[case] repo_type: RepoType) {
    let Some((user_repo, _transaction_repo)) = utils::build_repos(repo_type).await else {
        return;
    };

    let a = utils::create_test_user(&user_repo).await;
    let b = utils::create_test_user(&user_repo).await;
    assert_ne!(a.id, b.id);
    assert!(a.created_at <= b.created_at);
}
