//! Branch semantics against the in-memory store

use activity_dispatch::{
    BranchStatus, CommentChange, DispatchError, CommentContent, CommentRef, PostChange, PostContent, ReactionActivity,
    ReactionChange, ReactionRef, ReplyChange, ReplyContent, ReplyRef,
};
use activity_model::{ActivityKind, ActivityRecord};
use activity_store::USERS_COLLECTION;
use activity_test_utils::{
    comment, comment_reaction, network, other_network, post, post_mention, reply, request, TestHarness, ALICE, BOB,
    CAROL, DAVE,
};
use pretty_assertions::assert_eq;

fn committed(status: &BranchStatus) -> (usize, usize) {
    match status {
        BranchStatus::Committed { written, deleted } => (*written, *deleted),
        other => panic!("expected a commit, got {other:?}"),
    }
}

fn post_level_mentions(h: &TestHarness) -> Vec<ActivityRecord> {
    h.records_of(ActivityKind::Mentioned)
        .into_iter()
        .filter(|r| r.comment_id.is_none() && r.network == network())
        .collect()
}

// Comment

#[tokio::test]
async fn comment_create_with_mention_writes_commented_and_mentioned() {
    let h = TestHarness::new();
    let change = CommentChange::Create(CommentContent::new(BOB, post(), comment("c1", BOB), "agreed, user/alice"));

    let outcome = h.dispatcher.dispatch(&request(change)).await;
    assert_eq!(committed(&outcome.status), (2, 0));

    let commented = h.records_of(ActivityKind::Commented);
    let mentioned = h.records_of(ActivityKind::Mentioned);
    assert_eq!(commented.len(), 1);
    assert_eq!(mentioned.len(), 1);

    assert_eq!(commented[0].comment_id.as_deref(), Some("c1"));
    assert_eq!(mentioned[0].comment_id.as_deref(), Some("c1"));
    assert_eq!(commented[0].actor, Some(BOB));
    assert_eq!(commented[0].comment_author_id, Some(BOB));
    assert_eq!(commented[0].post_author_id, ALICE);
    assert_eq!(mentioned[0].mentioned_user_ids, Some(vec![ALICE]));
}

#[tokio::test]
async fn comment_create_without_mentions_writes_commented_only() {
    let h = TestHarness::new();
    let change = CommentChange::Create(CommentContent::new(BOB, post(), comment("c1", BOB), "user/nobody here"));

    let outcome = h.dispatcher.dispatch(&request(change)).await;
    assert_eq!(committed(&outcome.status), (1, 0));
    assert_eq!(h.records().len(), 1);
    assert_eq!(h.records()[0].kind, ActivityKind::Commented);
}

#[tokio::test]
async fn html_comment_resolves_profile_links() {
    let h = TestHarness::new();
    let html = r#"<p>see <a href="https://polkadot.polkassembly.io/user/carol-w">@carol-w</a></p>"#;
    let change = CommentChange::Create(CommentContent::new(BOB, post(), comment("c1", BOB), html));

    h.dispatcher.dispatch(&request(change)).await;

    let mentioned = h.records_of(ActivityKind::Mentioned);
    assert_eq!(mentioned[0].mentioned_user_ids, Some(vec![CAROL]));
}

#[tokio::test]
async fn comment_authored_by_someone_else_is_rejected() {
    let h = TestHarness::new();
    let foreign = comment("c1", CAROL);

    for change in [
        CommentChange::Create(CommentContent::new(BOB, post(), foreign.clone(), "user/alice")),
        CommentChange::Edit(CommentContent::new(BOB, post(), foreign.clone(), "user/dave_99")),
    ] {
        let outcome = h.dispatcher.dispatch(&request(change)).await;
        assert!(matches!(
            outcome.error(),
            Some(DispatchError::InvalidParams(_))
        ));
    }

    let outcome = h
        .dispatcher
        .dispatch(&request(ReplyChange::Create(ReplyContent::new(
            BOB,
            post(),
            comment("c1", BOB),
            reply("r1", CAROL),
            "user/alice",
        ))))
        .await;
    assert!(outcome.is_failed());

    assert!(h.records().is_empty());
    assert_eq!(h.store.stats().commits, 0);
}

#[tokio::test]
async fn comment_edit_replaces_comment_mentions_only() {
    let h = TestHarness::new();
    let target = comment("c1", BOB);
    h.dispatcher
        .dispatch(&request(CommentChange::Create(CommentContent::new(BOB, post(), target.clone(), "user/alice"))))
        .await;

    // BOB's reply under his own comment carries the same comment context
    let reply_mention = ActivityRecord::new(ActivityKind::Mentioned, network(), &post())
        .by(BOB)
        .with_comment(&target)
        .with_reply(&reply("r1", BOB))
        .with_mentions(vec![DAVE]);
    h.seed_record(&reply_mention);

    let outcome = h
        .dispatcher
        .dispatch(&request(CommentChange::Edit(CommentContent::new(BOB, post(), target, "now user/bob"))))
        .await;
    assert_eq!(committed(&outcome.status), (1, 1));

    let comment_mentions: Vec<_> = h
        .records_of(ActivityKind::Mentioned)
        .into_iter()
        .filter(|r| r.reply_id.is_none())
        .collect();
    assert_eq!(comment_mentions.len(), 1);
    assert_eq!(comment_mentions[0].mentioned_user_ids, Some(vec![BOB]));
    assert!(h.records().contains(&reply_mention));
    assert_eq!(h.records_of(ActivityKind::Commented).len(), 1);
}

#[tokio::test]
async fn comment_delete_removes_scoped_records() {
    let h = TestHarness::new();
    let c1 = comment("c1", BOB);
    let c2 = comment("c2", CAROL);

    h.dispatcher
        .dispatch_all(&[
            request(CommentChange::Create(CommentContent::new(BOB, post(), c1.clone(), "cc user/alice"))),
            request(CommentChange::Create(CommentContent::new(CAROL, post(), c2.clone(), "cc user/bob"))),
        ])
        .await;
    h.seed_record(&comment_reaction(CAROL, "like", &c1));
    h.seed_record(&comment_reaction(DAVE, "clap", &c1));
    h.seed_record(&comment_reaction(ALICE, "like", &c2));
    assert_eq!(h.records().len(), 7);

    let outcome = h
        .dispatcher
        .dispatch(&request(CommentChange::Delete(CommentRef::new(BOB, "c1"))))
        .await;
    assert_eq!(committed(&outcome.status), (0, 4));

    let remaining = h.records();
    assert_eq!(remaining.len(), 3);
    assert!(remaining.iter().all(|r| r.comment_id.as_deref() == Some("c2")));
}

#[tokio::test]
async fn comment_delete_by_another_user_removes_nothing() {
    let h = TestHarness::new();
    h.dispatcher
        .dispatch(&request(CommentChange::Create(CommentContent::new(BOB, post(), comment("c1", BOB), "user/alice"))))
        .await;

    let outcome = h
        .dispatcher
        .dispatch(&request(CommentChange::Delete(CommentRef::new(DAVE, "c1"))))
        .await;

    assert!(matches!(outcome.status, BranchStatus::NoOp));
    assert_eq!(h.records().len(), 2);
}

// Post

#[tokio::test]
async fn post_create_records_mentions() {
    let h = TestHarness::new();
    let change = PostChange::Create(PostContent::new(ALICE, post(), "ping user/bob and user/dave_99 and user/bob"));

    let outcome = h.dispatcher.dispatch(&request(change)).await;
    assert_eq!(committed(&outcome.status), (1, 0));

    let mentions = post_level_mentions(&h);
    assert_eq!(mentions.len(), 1);
    assert_eq!(mentions[0].actor, Some(ALICE));
    assert_eq!(mentions[0].mentioned_user_ids, Some(vec![BOB, DAVE]));
}

#[tokio::test]
async fn post_create_without_mentions_is_noop() {
    let h = TestHarness::new();
    let outcome = h
        .dispatcher
        .dispatch(&request(PostChange::Create(PostContent::new(ALICE, post(), "plain body"))))
        .await;

    assert!(matches!(outcome.status, BranchStatus::NoOp));
    assert!(h.records().is_empty());
}

#[tokio::test]
async fn post_edit_replaces_every_prior_post_mention() {
    let h = TestHarness::new();
    h.seed_record(&post_mention(ALICE, vec![BOB]));
    h.seed_record(&post_mention(CAROL, vec![DAVE]));

    let comment_mention = ActivityRecord::new(ActivityKind::Mentioned, network(), &post())
        .by(BOB)
        .with_comment(&comment("c1", BOB))
        .with_mentions(vec![ALICE]);
    let elsewhere = ActivityRecord::new(ActivityKind::Mentioned, other_network(), &post())
        .by(ALICE)
        .with_mentions(vec![BOB]);
    h.seed_record(&comment_mention);
    h.seed_record(&elsewhere);

    let outcome = h
        .dispatcher
        .dispatch(&request(PostChange::Edit(PostContent::new(ALICE, post(), "now user/carol-w"))))
        .await;
    assert_eq!(committed(&outcome.status), (1, 2));

    let mentions = post_level_mentions(&h);
    assert_eq!(mentions.len(), 1);
    assert_eq!(mentions[0].mentioned_user_ids, Some(vec![CAROL]));

    let records = h.records();
    assert!(records.contains(&comment_mention));
    assert!(records.contains(&elsewhere));
}

#[tokio::test]
async fn post_edit_without_mentions_leaves_none() {
    let h = TestHarness::new();
    h.seed_record(&post_mention(ALICE, vec![BOB]));

    let outcome = h
        .dispatcher
        .dispatch(&request(PostChange::Edit(PostContent::new(ALICE, post(), "mentions removed"))))
        .await;
    assert_eq!(committed(&outcome.status), (0, 1));
    assert!(post_level_mentions(&h).is_empty());
}

#[tokio::test]
async fn post_over_scan_limit_skips_user_lookup() {
    let h = TestHarness::new();
    let content = format!("user/alice {}", "user/ ".repeat(1_000));

    let outcome = h
        .dispatcher
        .dispatch(&request(PostChange::Create(PostContent::new(ALICE, post(), content))))
        .await;

    assert!(matches!(outcome.status, BranchStatus::NoOp));
    assert_eq!(h.store.queries_on(USERS_COLLECTION), 0);
}

// Reply

#[tokio::test]
async fn reply_create_writes_replied_and_mentioned_with_context() {
    let h = TestHarness::new();
    let change = ReplyChange::Create(ReplyContent::new(
        CAROL,
        post(),
        comment("c1", BOB),
        reply("r1", CAROL),
        "user/bob thanks",
    ));

    let outcome = h.dispatcher.dispatch(&request(change)).await;
    assert_eq!(committed(&outcome.status), (2, 0));

    for record in h.records() {
        assert_eq!(record.actor, Some(CAROL));
        assert_eq!(record.comment_id.as_deref(), Some("c1"));
        assert_eq!(record.comment_author_id, Some(BOB));
        assert_eq!(record.reply_id.as_deref(), Some("r1"));
        assert_eq!(record.reply_author_id, Some(CAROL));
    }
    assert_eq!(h.records_of(ActivityKind::Replied).len(), 1);
    assert_eq!(
        h.records_of(ActivityKind::Mentioned)[0].mentioned_user_ids,
        Some(vec![BOB])
    );
}

#[tokio::test]
async fn reply_edit_replaces_reply_mentions() {
    let h = TestHarness::new();
    let body = |content: &str| ReplyContent::new(CAROL, post(), comment("c1", BOB), reply("r1", CAROL), content);

    h.dispatcher
        .dispatch(&request(ReplyChange::Create(body("user/bob"))))
        .await;
    let outcome = h
        .dispatcher
        .dispatch(&request(ReplyChange::Edit(body("actually user/dave_99"))))
        .await;
    assert_eq!(committed(&outcome.status), (1, 1));

    let mentioned = h.records_of(ActivityKind::Mentioned);
    assert_eq!(mentioned.len(), 1);
    assert_eq!(mentioned[0].mentioned_user_ids, Some(vec![DAVE]));
    assert_eq!(h.records_of(ActivityKind::Replied).len(), 1);
}

#[tokio::test]
async fn reply_delete_removes_reply_and_scoped_records() {
    let h = TestHarness::new();
    let c1 = comment("c1", BOB);
    let r1 = reply("r1", CAROL);
    h.dispatcher
        .dispatch(&request(ReplyChange::Create(ReplyContent::new(
            CAROL,
            post(),
            c1.clone(),
            r1.clone(),
            "user/alice",
        ))))
        .await;
    h.seed_record(
        &ActivityRecord::new(ActivityKind::Reacted, network(), &post())
            .by(ALICE)
            .with_reaction("like", ALICE)
            .with_comment(&c1)
            .with_reply(&r1),
    );
    h.seed_record(&comment_reaction(DAVE, "like", &c1));

    let outcome = h
        .dispatcher
        .dispatch(&request(ReplyChange::Delete(ReplyRef::new(CAROL, "r1"))))
        .await;
    assert_eq!(committed(&outcome.status), (0, 3));

    let remaining = h.records();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].reply_id, None);
}

// Reaction

#[tokio::test]
async fn reaction_create_then_delete() {
    let h = TestHarness::new();
    let on_reply = ReactionActivity::new(DAVE, "like-1", post()).on_reply(comment("c1", BOB), reply("r1", CAROL));
    let other = ReactionActivity::new(ALICE, "like-2", post());

    let report = h
        .dispatcher
        .dispatch_all(&[
            request(ReactionChange::Create(on_reply)),
            request(ReactionChange::Create(other)),
        ])
        .await;
    assert!(report.is_success());
    assert_eq!(report.written(), 2);

    let reacted = h.records_of(ActivityKind::Reacted);
    let dave = reacted.iter().find(|r| r.actor == Some(DAVE)).unwrap();
    assert_eq!(dave.reaction_id.as_deref(), Some("like-1"));
    assert_eq!(dave.reaction_author_id, Some(DAVE));
    assert_eq!(dave.comment_id.as_deref(), Some("c1"));
    assert_eq!(dave.reply_id.as_deref(), Some("r1"));

    let outcome = h
        .dispatcher
        .dispatch(&request(ReactionChange::Delete(ReactionRef::new(DAVE, "like-1"))))
        .await;
    assert_eq!(committed(&outcome.status), (0, 1));

    let remaining = h.records_of(ActivityKind::Reacted);
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].actor, Some(ALICE));
}

#[tokio::test]
async fn reaction_delete_is_scoped_to_network() {
    let h = TestHarness::new();
    h.dispatcher
        .dispatch(&request(ReactionChange::Create(ReactionActivity::new(DAVE, "like-1", post()))))
        .await;

    let elsewhere = activity_dispatch::ActivityRequest::new(
        other_network(),
        ReactionChange::Delete(ReactionRef::new(DAVE, "like-1")),
    );
    let outcome = h.dispatcher.dispatch(&elsewhere).await;

    assert!(matches!(outcome.status, BranchStatus::NoOp));
    assert_eq!(h.records_of(ActivityKind::Reacted).len(), 1);
}
