use leptos::prelude::*;
use leptos_meta::Title;
use leptos_router::hooks::{use_location, use_navigate};

use crate::{
    blog::{PostMeta, GLOBAL_META_CACHE},
    content::{Project, PROJECTS, SKILLS, TESTIMONIALS},
};

use super::{
    blog::get_meta_server, contact::ContactForm, header::SectionNavigator, reveal::Reveal,
};

const BLOG_PREVIEW_LEN: usize = 3;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <Title text="Home" />
        <Hero />
        <Reveal>
            <About />
        </Reveal>
        <Reveal>
            <Projects />
        </Reveal>
        <Reveal>
            <Skills />
        </Reveal>
        <Reveal>
            <Testimonials />
        </Reveal>
        <Reveal>
            <BlogPreview />
        </Reveal>
        <Reveal>
            <section id="contact-form" class="py-20 px-4">
                <div class="max-w-2xl mx-auto">
                    <h2 class="text-3xl font-bold text-center mb-8">"Get In Touch"</h2>
                    <ContactForm />
                </div>
            </section>
        </Reveal>
    }
}

#[component]
fn Hero() -> impl IntoView {
    let navigator = expect_context::<SectionNavigator>();
    let pathname = use_location().pathname;
    let navigate = use_navigate();
    let go = move |id: &'static str| navigator.go(id, &pathname.get_untracked(), &navigate);
    let go_contact = go.clone();

    view! {
        <section class="min-h-screen flex items-center justify-center px-4">
            <div class="text-center max-w-3xl">
                <h1 class="text-5xl md:text-6xl font-bold mb-6">
                    "Hi, I'm "
                    <span class="text-violet-600 dark:text-violet-400">"Honey"</span>
                </h1>
                <p class="text-xl text-gray-600 dark:text-gray-300 mb-10">
                    "Frontend developer building fast, accessible interfaces that feel calm to use."
                </p>
                <div class="flex flex-wrap gap-4 justify-center">
                    <button
                        type="button"
                        class="px-6 py-3 rounded-full bg-violet-600 text-white font-semibold hover:bg-violet-700 transition-colors"
                        on:click=move |_| go("projects")
                    >
                        "View My Work"
                    </button>
                    <button
                        type="button"
                        class="px-6 py-3 rounded-full border border-violet-600 text-violet-600 dark:text-violet-400 font-semibold hover:bg-violet-50 dark:hover:bg-gray-800 transition-colors"
                        on:click=move |_| go_contact("contact-form")
                    >
                        "Get In Touch"
                    </button>
                </div>
            </div>
        </section>
    }
}

#[component]
fn About() -> impl IntoView {
    view! {
        <section id="about" class="py-20 px-4">
            <div class="max-w-5xl mx-auto grid md:grid-cols-2 gap-12 items-center">
                <div>
                    <h2 class="text-3xl font-bold mb-6">"About Me"</h2>
                    <p class="text-gray-600 dark:text-gray-300 mb-4 leading-relaxed">
                        "I care about the small details: motion that respects your settings, "
                        "navigation that never loses its place, and pages that work before "
                        "the JavaScript arrives."
                    </p>
                    <p class="text-gray-600 dark:text-gray-300 leading-relaxed">
                        "Most of my work sits between design and engineering, turning mockups "
                        "into components that hold up in production."
                    </p>
                </div>
                <div class="flex justify-center">
                    <img
                        src="/images/profile.webp"
                        alt="Portrait of Honey"
                        class="w-64 h-64 rounded-full object-cover shadow-lg"
                        loading="lazy"
                    />
                </div>
            </div>
        </section>
    }
}

#[component]
fn Projects() -> impl IntoView {
    view! {
        <section id="projects" class="py-20 px-4 bg-gray-50 dark:bg-gray-900/50">
            <div class="max-w-6xl mx-auto">
                <h2 class="text-3xl font-bold text-center mb-12">"Projects"</h2>
                <Reveal stagger=true class="grid md:grid-cols-2 lg:grid-cols-3 gap-8">
                    {PROJECTS.iter().map(|p| view! { <ProjectCard project=p /> }).collect_view()}
                </Reveal>
            </div>
        </section>
    }
}

#[component]
fn ProjectCard(project: &'static Project) -> impl IntoView {
    view! {
        <article class="reveal-item rounded-2xl overflow-hidden bg-white dark:bg-gray-800 shadow hover:shadow-xl transition-shadow">
            {project
                .image
                .as_ref()
                .map(|src| {
                    view! {
                        <img
                            src=src.clone()
                            alt=project.title.clone()
                            class="w-full h-48 object-cover"
                            loading="lazy"
                        />
                    }
                })}
            <div class="p-6">
                <h3 class="text-xl font-semibold mb-1">{project.title.clone()}</h3>
                {project
                    .subtitle
                    .as_ref()
                    .map(|s| view! { <p class="text-sm text-gray-500 mb-3">{s.clone()}</p> })}
                {project
                    .description
                    .as_ref()
                    .map(|d| {
                        view! { <p class="text-gray-600 dark:text-gray-300 mb-4">{d.clone()}</p> }
                    })}
                <ul class="flex flex-wrap gap-2 mb-4">
                    {project
                        .card_tech()
                        .iter()
                        .map(|t| {
                            view! {
                                <li class="px-2 py-1 text-xs rounded-full bg-violet-100 text-violet-700 dark:bg-violet-900/40 dark:text-violet-300">
                                    {t.clone()}
                                </li>
                            }
                        })
                        .collect_view()}
                </ul>
                <a
                    href=project.href()
                    class="font-semibold text-violet-600 dark:text-violet-400 hover:underline"
                >
                    "View details →"
                </a>
            </div>
        </article>
    }
}

#[component]
fn Skills() -> impl IntoView {
    view! {
        <section id="skills" class="py-20 px-4">
            <div class="max-w-5xl mx-auto">
                <h2 class="text-3xl font-bold text-center mb-12">"Skills"</h2>
                <Reveal stagger=true class="grid grid-cols-2 md:grid-cols-4 gap-6">
                    {SKILLS
                        .iter()
                        .map(|skill| {
                            view! {
                                <div class="reveal-item p-6 rounded-xl bg-white dark:bg-gray-800 shadow text-center">
                                    <div class="text-3xl mb-2" aria-hidden="true">
                                        {skill.emoji.clone()}
                                    </div>
                                    <div class="font-semibold">{skill.name.clone()}</div>
                                    <div class="text-sm text-gray-500">{skill.level.clone()}</div>
                                </div>
                            }
                        })
                        .collect_view()}
                </Reveal>
            </div>
        </section>
    }
}

#[component]
fn Testimonials() -> impl IntoView {
    view! {
        <section class="py-20 px-4 bg-gray-50 dark:bg-gray-900/50">
            <div class="max-w-5xl mx-auto">
                <h2 class="text-3xl font-bold text-center mb-12">"Kind Words"</h2>
                <Reveal stagger=true class="grid md:grid-cols-3 gap-6">
                    {TESTIMONIALS
                        .iter()
                        .map(|t| {
                            view! {
                                <figure class="reveal-item p-6 rounded-xl bg-white dark:bg-gray-800 shadow">
                                    <blockquote class="italic text-gray-600 dark:text-gray-300 mb-4">
                                        {format!("“{}”", t.text)}
                                    </blockquote>
                                    <figcaption>
                                        <div class="font-semibold">{t.name.clone()}</div>
                                        {t
                                            .role
                                            .as_ref()
                                            .map(|r| {
                                                view! { <div class="text-sm text-gray-500">{r.clone()}</div> }
                                            })}
                                    </figcaption>
                                </figure>
                            }
                        })
                        .collect_view()}
                </Reveal>
            </div>
        </section>
    }
}

#[component]
fn BlogPreview() -> impl IntoView {
    let posts = Resource::new(
        || (),
        |_| async move {
            let cache = &*GLOBAL_META_CACHE;
            if let Some(cached) = cache.get(&()) {
                return (*cached).clone();
            }
            match get_meta_server().await {
                Ok(meta) => {
                    #[cfg(feature = "hydrate")]
                    cache.insert((), meta.clone());
                    meta
                }
                Err(e) => {
                    log::error!("couldn't load blog posts: {e}");
                    Vec::new()
                }
            }
        },
    );

    view! {
        <section class="py-20 px-4">
            <div class="max-w-5xl mx-auto">
                <h2 class="text-3xl font-bold text-center mb-12">"From the Blog"</h2>
                <Transition fallback=move || {
                    view! {
                        <div class="grid md:grid-cols-3 gap-6">
                            <div class="loading-skeleton h-40 rounded-xl"></div>
                            <div class="loading-skeleton h-40 rounded-xl"></div>
                            <div class="loading-skeleton h-40 rounded-xl"></div>
                        </div>
                    }
                }>
                    {move || Suspend::new(async move {
                        let posts = posts.await;
                        view! {
                            <div class="grid md:grid-cols-3 gap-6">
                                {posts
                                    .into_iter()
                                    .take(BLOG_PREVIEW_LEN)
                                    .map(|post| view! { <PostCard post /> })
                                    .collect_view()}
                            </div>
                        }
                    })}
                </Transition>
            </div>
        </section>
    }
}

#[component]
fn PostCard(post: PostMeta) -> impl IntoView {
    let href = post.href();
    view! {
        <a
            href=href
            class="block p-6 rounded-xl bg-white dark:bg-gray-800 shadow hover:shadow-lg transition-shadow"
        >
            <time class="text-sm text-gray-500" datetime=post.date.to_rfc3339()>
                {post.date.format("%B %-d, %Y").to_string()}
            </time>
            <h3 class="text-lg font-semibold my-2">{post.title}</h3>
            <p class="text-gray-600 dark:text-gray-300 text-sm">{post.excerpt}</p>
        </a>
    }
}

#[cfg(all(test, feature = "ssr"))]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_post_card_links_to_post() {
        let owner = Owner::new();
        owner.set();
        let post = PostMeta {
            name: "hello".to_string(),
            title: "Hello".to_string(),
            excerpt: "Short".to_string(),
            author: "Honey".to_string(),
            date: chrono::Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap(),
            tags: Vec::new(),
        };
        let html = view! { <PostCard post /> }.to_html();
        assert!(html.contains("href=\"/blog/hello\""));
        assert!(html.contains("January 2, 2025"));
        assert!(html.contains("Short"));
    }
}
