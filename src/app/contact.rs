use leptos::prelude::*;
use leptos_meta::Title;

#[cfg(feature = "ssr")]
use crate::{config::SITE_CONFIG, contact::deliver};
use crate::contact::{ContactDraft, ContactStatus, STATUS_RESET};

use super::{browser, confetti::Confetti, reveal::Reveal};

#[server]
pub async fn send_contact(draft: ContactDraft, source: String) -> Result<(), ServerFnError> {
    draft.validate().map_err(ServerFnError::new)?;
    let message = draft.into_message(source, chrono::Utc::now());
    deliver(&SITE_CONFIG, &message).await.map_err(|e| {
        tracing::error!(error = %e, "contact message not delivered");
        ServerFnError::new(e)
    })
}

#[component]
pub fn ContactPage() -> impl IntoView {
    view! {
        <Title text="Contact" />
        <Reveal>
            <section id="contact-form" class="py-20 px-4">
                <div class="max-w-2xl mx-auto">
                    <h1 class="text-3xl font-bold text-center mb-8">"Get In Touch"</h1>
                    <ContactForm />
                </div>
            </section>
        </Reveal>
    }
}

#[component]
pub fn ContactForm() -> impl IntoView {
    let (name, set_name) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (message, set_message) = signal(String::new());
    let (status, set_status) = signal(ContactStatus::Idle);
    let (notice, set_notice) = signal(None::<String>);
    let (bursts, set_bursts) = signal(0u32);
    let reset = StoredValue::new(None::<TimeoutHandle>);

    let send = Action::new(|(draft, source): &(ContactDraft, String)| {
        let (draft, source) = (draft.clone(), source.clone());
        async move { send_contact(draft, source).await }
    });

    Effect::new(move |_| {
        let Some(result) = send.value().get() else {
            return;
        };
        if let Err(e) = &result {
            log::error!("contact submit failed: {e}");
        }
        let finished = ContactStatus::finished(&result);
        set_status.set(finished);
        if result.is_ok() {
            set_name.set(String::new());
            set_email.set(String::new());
            set_message.set(String::new());
            set_bursts.update(|n| *n += 1);
        }
        if finished.expires() {
            reset.update_value(|handle| {
                if let Some(h) = handle.take() {
                    h.clear();
                }
                *handle = set_timeout_with_handle(
                    move || set_status.update(|s| *s = s.expired()),
                    STATUS_RESET,
                )
                .map_err(|e| log::warn!("couldn't schedule status reset: {e:?}"))
                .ok();
            });
        }
    });
    on_cleanup(move || {
        reset.try_update_value(|handle| handle.take().map(|h| h.clear()));
    });

    let submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(sending) = status.get_untracked().submit() else {
            return;
        };
        let draft = ContactDraft {
            name: name.get_untracked(),
            email: email.get_untracked(),
            message: message.get_untracked(),
        };
        if let Err(e) = draft.validate() {
            set_notice.set(Some(e.to_string()));
            return;
        }
        set_notice.set(None);
        reset.update_value(|handle| {
            if let Some(h) = handle.take() {
                h.clear();
            }
        });
        set_status.set(sending);
        send.dispatch((draft, browser::current_href()));
    };

    let button_label = move || match status.get() {
        ContactStatus::Idle => "Send Message",
        ContactStatus::Sending => "Sending...",
        ContactStatus::Sent => "Sent ✓",
        ContactStatus::Failed => "Failed, try again",
    };
    let field = "w-full px-4 py-3 rounded-lg border border-gray-300 dark:border-gray-700 bg-white dark:bg-gray-800 focus:outline-none focus:ring-2 focus:ring-violet-500";

    view! {
        <form class="space-y-4" on:submit=submit novalidate>
            <div>
                <label for="contact-name" class="block text-sm font-medium mb-1">"Name"</label>
                <input
                    id="contact-name"
                    type="text"
                    class=field
                    prop:value=name
                    on:input=move |ev| set_name.set(event_target_value(&ev))
                    required
                />
            </div>
            <div>
                <label for="contact-email" class="block text-sm font-medium mb-1">"Email"</label>
                <input
                    id="contact-email"
                    type="email"
                    class=field
                    prop:value=email
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                    required
                />
            </div>
            <div>
                <label for="contact-message" class="block text-sm font-medium mb-1">
                    "Message"
                </label>
                <textarea
                    id="contact-message"
                    rows="5"
                    class=field
                    prop:value=message
                    on:input=move |ev| set_message.set(event_target_value(&ev))
                    required
                />
            </div>
            {move || {
                notice
                    .get()
                    .map(|text| {
                        view! {
                            <p class="text-sm text-red-600 dark:text-red-400" role="alert">
                                {text}
                            </p>
                        }
                    })
            }}
            <button
                type="submit"
                class="w-full px-6 py-3 rounded-full font-semibold text-white transition-colors disabled:opacity-60"
                class=(["bg-violet-600", "hover:bg-violet-700"], move || !matches!(status.get(), ContactStatus::Sent | ContactStatus::Failed))
                class=("bg-green-600", move || status.get() == ContactStatus::Sent)
                class=("bg-red-600", move || status.get() == ContactStatus::Failed)
                disabled=move || status.get().is_busy()
                aria-live="polite"
            >
                {button_label}
            </button>
        </form>
        <Confetti trigger=bursts />
    }
}
