//! Template engine setup and HTML templates.

use once_cell::sync::Lazy;
use tera::{Context, Tera};

/// Global template engine instance with embedded templates.
pub static TEMPLATES: Lazy<Tera> = Lazy::new(|| {
    let mut tera = Tera::default();

    // Embed templates directly in the binary (no external files needed)
    tera.add_raw_templates(vec![
        ("base.html", BASE_TEMPLATE),
        ("home.html", HOME_TEMPLATE),
        ("about.html", ABOUT_TEMPLATE),
        ("blog.html", BLOG_TEMPLATE),
        ("post.html", POST_TEMPLATE),
        ("classes.html", CLASSES_TEMPLATE),
        ("class.html", CLASS_TEMPLATE),
        ("contact.html", CONTACT_TEMPLATE),
        ("login.html", LOGIN_TEMPLATE),
        ("error.html", ERROR_TEMPLATE),
        ("admin/nav.html", ADMIN_NAV_TEMPLATE),
        ("admin/dashboard.html", ADMIN_DASHBOARD_TEMPLATE),
        ("admin/posts.html", ADMIN_POSTS_TEMPLATE),
        ("admin/classes.html", ADMIN_CLASSES_TEMPLATE),
        ("admin/new_post.html", ADMIN_NEW_POST_TEMPLATE),
        ("admin/new_class.html", ADMIN_NEW_CLASS_TEMPLATE),
        ("admin/json_editor.html", ADMIN_JSON_EDITOR_TEMPLATE),
        ("admin/messages.html", ADMIN_MESSAGES_TEMPLATE),
        ("admin/registrations.html", ADMIN_REGISTRATIONS_TEMPLATE),
        ("admin/settings.html", ADMIN_SETTINGS_TEMPLATE),
        ("admin/account.html", ADMIN_ACCOUNT_TEMPLATE),
    ])
    .expect("Failed to load templates");

    tera
});

/// Render a template with context
pub fn render(template: &str, context: &Context) -> Result<String, tera::Error> {
    TEMPLATES.render(template, context)
}

// =============================================================================
// Public site
// =============================================================================

const BASE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="{{ lang | default(value='en') }}" dir="{% if lang == 'fa' %}rtl{% else %}ltr{% endif %}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{% block title %}Fluentia{% endblock %}</title>
    <style>
        :root { --bg: #fdfcf9; --fg: #1f2328; --muted: #6b7280; --border: #e5e7eb; --accent: #b45309; }
        * { box-sizing: border-box; }
        body { margin: 0; font-family: -apple-system, "Segoe UI", Helvetica, Arial, sans-serif; background: var(--bg); color: var(--fg); line-height: 1.6; }
        a { color: var(--accent); text-decoration: none; }
        .header, .footer { padding: 16px 32px; border-bottom: 1px solid var(--border); display: flex; gap: 20px; align-items: center; }
        .footer { border-top: 1px solid var(--border); border-bottom: none; color: var(--muted); }
        .brand { font-weight: 700; margin-inline-end: auto; color: var(--fg); }
        main { max-width: 960px; margin: 0 auto; padding: 32px; }
        .card { border: 1px solid var(--border); border-radius: 8px; padding: 20px; margin-bottom: 16px; background: #fff; }
        .muted { color: var(--muted); }
        .notice { padding: 12px 16px; border-radius: 6px; margin-bottom: 16px; }
        .notice.ok { background: #ecfdf5; }
        .notice.error { background: #fef2f2; }
        label { display: block; margin-top: 12px; font-weight: 600; }
        input, textarea, select { width: 100%; padding: 8px; border: 1px solid var(--border); border-radius: 6px; font: inherit; }
        button { margin-top: 16px; padding: 8px 16px; border: none; border-radius: 6px; background: var(--accent); color: #fff; cursor: pointer; }
        table { width: 100%; border-collapse: collapse; }
        td, th { text-align: start; padding: 8px; border-bottom: 1px solid var(--border); vertical-align: top; }
    </style>
</head>
<body>
    <header class="header">
        <a class="brand" href="/?lang={{ lang }}">Fluentia</a>
        <a href="/about?lang={{ lang }}">About</a>
        <a href="/classes?lang={{ lang }}">Classes</a>
        <a href="/blog?lang={{ lang }}">Blog</a>
        <a href="/contact?lang={{ lang }}">Contact</a>
        <span class="muted">
            <a href="?lang=en">EN</a> · <a href="?lang=de">DE</a> · <a href="?lang=fa">FA</a>
        </span>
    </header>
    <main>
        {% if notice %}<div class="notice {{ notice.status }}">{{ notice.message }}</div>{% endif %}
        {% block content %}{% endblock %}
    </main>
    <footer class="footer">Fluentia German School</footer>
</body>
</html>"##;

const HOME_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ home.seo.title[lang] | default(value="Fluentia") }}{% endblock %}
{% block content %}
<section class="card">
    <h1>{{ home.slogan[lang] }}</h1>
    <p>{{ home.subSlogan[lang] }}</p>
    <p><a href="/classes?lang={{ lang }}">{{ home.ctaClasses[lang] }}</a></p>
</section>
<section>
    <h2>{{ home.missionTitle[lang] }}</h2>
    <p>{{ home.missionText[lang] }}</p>
    <h2>{{ home.manifestoTitle[lang] }}</h2>
    <p>{{ home.manifestoText[lang] }}</p>
</section>
<section>
    <h2>{{ home.recentPostsTitle[lang] }}</h2>
    {% for post in recent_posts %}
    <div class="card">
        <h3><a href="/blog/{{ post.slug }}?lang={{ lang }}">{{ post.title[lang] }}</a></h3>
        <p class="muted">{{ post.excerpt[lang] }}</p>
        <a href="/blog/{{ post.slug }}?lang={{ lang }}">{{ home.readMore[lang] }}</a>
    </div>
    {% endfor %}
</section>
<section class="card">
    <h2>{{ home.ctaTitle[lang] }}</h2>
    <p>{{ home.ctaText[lang] }}</p>
</section>
{% endblock %}"##;

const ABOUT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ about.seo.title[lang] | default(value="About") }}{% endblock %}
{% block content %}
<h1>{{ about.title[lang] }}</h1>
<p>{{ about.story[lang] }}</p>
<h2>{{ about.qualificationsTitle[lang] }}</h2>
<div class="card">
    <h3>{{ about.testdafTitle[lang] }}</h3>
    <p>{{ about.testdafDescription[lang] }}</p>
</div>
<h2>{{ about.timelineTitle[lang] }}</h2>
{% for event in timeline %}
<div class="card">
    <strong>{{ event.year }}</strong> · {{ event.title[lang] }}
    <p class="muted">{{ event.description[lang] }}</p>
</div>
{% endfor %}
{% endblock %}"##;

const BLOG_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Blog{% endblock %}
{% block content %}
<h1>Blog</h1>
{% if posts | length == 0 %}<p class="muted">No posts yet.</p>{% endif %}
{% for post in posts %}
<div class="card">
    <h2><a href="/blog/{{ post.slug }}?lang={{ lang }}">{{ post.title[lang] }}</a></h2>
    <p class="muted">{{ post.author }} · {{ post.date | truncate(length=10, end="") }} · {{ post.category }}</p>
    <p>{{ post.excerpt[lang] }}</p>
</div>
{% endfor %}
{% endblock %}"##;

const POST_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ post.title[lang] }}{% endblock %}
{% block content %}
<article>
    <h1>{{ post.title[lang] }}</h1>
    <p class="muted">{{ post.author }} · {{ post.date | truncate(length=10, end="") }}</p>
    <div style="white-space: pre-line">{{ post.content[lang] }}</div>
    <p class="muted">{% for tag in post.tags %}#{{ tag[lang] }} {% endfor %}</p>
</article>
{% endblock %}"##;

const CLASSES_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Classes{% endblock %}
{% block content %}
<h1>Classes</h1>
{% for class in classes %}
<div class="card">
    <h2><a href="/classes/{{ class.slug }}?lang={{ lang }}">{{ class.title[lang] }}</a></h2>
    <p class="muted">{{ class.level | upper }} · {{ class.type }} · {{ class.status }}</p>
    <p>{{ class.excerpt[lang] }}</p>
</div>
{% endfor %}
{% endblock %}"##;

const CLASS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ class.title[lang] }}{% endblock %}
{% block content %}
<h1>{{ class.title[lang] }}</h1>
<p class="muted">{{ class.level | upper }} · {{ class.type }} · {{ class.schedule.days[lang] }} {{ class.schedule.time }}
{% if class.price %} · {{ class.price }} €{% endif %}{% if class.maxStudents %} · max {{ class.maxStudents }}{% endif %}</p>
<p>{{ class.description[lang] }}</p>
{% if class.objectives %}<h2>Objectives</h2><ul>{% for o in class.objectives %}<li>{{ o[lang] }}</li>{% endfor %}</ul>{% endif %}
{% if class.prerequisites %}<h2>Prerequisites</h2><ul>{% for p in class.prerequisites %}<li>{{ p[lang] }}</li>{% endfor %}</ul>{% endif %}
{% if class.status == "active" %}
<form class="card" method="POST" action="/classes/{{ class.slug }}?lang={{ lang }}">
    <h2>Register</h2>
    <label>Name <input name="name" required></label>
    <label>Email <input name="email" type="email" required></label>
    <label>Phone <input name="phone"></label>
    <label>Current German level <input name="germanLevel"></label>
    <label>Learning goal <input name="learningGoal"></label>
    <label>Motivation <textarea name="motivation"></textarea></label>
    <button type="submit">Register</button>
</form>
{% endif %}
{% endblock %}"##;

const CONTACT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}{{ contact.seo.title[lang] | default(value="Contact") }}{% endblock %}
{% block content %}
<h1>{{ contact.title[lang] }}</h1>
<p>{{ contact.description[lang] }}</p>
<div class="card">
    <p>{{ contact.contactInfo[lang] }}</p>
    <p><a href="mailto:{{ contact.email }}">{{ contact.email }}</a></p>
    <p>{{ contact.address[lang] }}</p>
</div>
<form class="card" method="POST" action="/contact?lang={{ lang }}">
    <label>Name <input name="name" required></label>
    <label>Email <input name="email" type="email" required></label>
    <label>Subject <input name="subject"></label>
    <label>Message <textarea name="message" rows="6" required></textarea></label>
    <button type="submit">Send</button>
</form>
{% endblock %}"##;

const LOGIN_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Login{% endblock %}
{% block content %}
<form class="card" method="POST" action="/login">
    <h1>Admin login</h1>
    {% if error %}<div class="notice error">{{ error }}</div>{% endif %}
    <input type="hidden" name="redirect" value="{{ redirect }}">
    <label>Email <input name="email" type="email" required></label>
    <label>Password <input name="password" type="password" required></label>
    <button type="submit">Sign in</button>
</form>
{% endblock %}"##;

const ERROR_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Error{% endblock %}
{% block content %}
<div class="card">
    <h1>Something went wrong</h1>
    <p class="muted">{{ message }}</p>
    <a href="/">Return home</a>
</div>
{% endblock %}"##;

// =============================================================================
// Admin area
// =============================================================================

const ADMIN_NAV_TEMPLATE: &str = r##"<nav class="card">
    <a href="/admin">Dashboard</a> ·
    <a href="/admin/blog">Blog</a> ·
    <a href="/admin/classes">Classes</a> ·
    <a href="/admin/content/edit/home">Home</a> ·
    <a href="/admin/content/edit/about">About</a> ·
    <a href="/admin/content/edit/contact">Contact</a> ·
    <a href="/admin/content/edit/timeline">Timeline</a> ·
    <a href="/admin/messages">Messages</a> ·
    <a href="/admin/registrations">Registrations</a> ·
    <a href="/admin/settings">Settings</a> ·
    <a href="/logout">Log out</a>
</nav>"##;

const ADMIN_DASHBOARD_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · Dashboard{% endblock %}
{% block content %}
{% include "admin/nav.html" %}
<h1>Dashboard</h1>
<div class="card">
    <p>Total views: <strong>{{ analytics.total_views }}</strong> · Unique visitors: <strong>{{ analytics.total_unique_visitors }}</strong></p>
    <p>Today: <strong>{{ analytics.views_today }}</strong> ({{ analytics.daily_change_percent | round(precision=1) }}% vs. yesterday) · Unique today: <strong>{{ analytics.unique_visitors_today }}</strong></p>
    <p>{{ counts.posts }} posts · {{ counts.classes }} classes · {{ counts.messages }} messages · {{ counts.registrations }} registrations</p>
</div>
<div class="card">
    <h2>Last 7 days</h2>
    <table>{% for day in analytics.daily_views %}<tr><td>{{ day.date }}</td><td>{{ day.views }}</td></tr>{% endfor %}</table>
</div>
<div class="card">
    <h2>Top pages</h2>
    <table>{% for page in analytics.top_pages %}<tr><td>{{ page.path }}</td><td>{{ page.views }}</td></tr>{% endfor %}</table>
</div>
<div class="card">
    <h2>Traffic sources</h2>
    <table>{% for source in analytics.traffic_sources %}<tr><td>{{ source.source }}</td><td>{{ source.views }}</td></tr>{% endfor %}</table>
</div>
{% endblock %}"##;

const ADMIN_POSTS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · Blog{% endblock %}
{% block content %}
{% include "admin/nav.html" %}
<h1>Blog posts</h1>
<p><a href="/admin/blog/new">New post</a></p>
<table>
{% for post in posts %}
<tr>
    <td><a href="/admin/blog/edit/{{ post.slug }}">{{ post.title.en }}</a><br><span class="muted">{{ post.slug }}</span></td>
    <td>{{ post.date | truncate(length=10, end="") }}</td>
    <td><form method="POST" action="/admin/blog/delete/{{ post.slug }}"><button type="submit">Delete</button></form></td>
</tr>
{% endfor %}
</table>
{% endblock %}"##;

const ADMIN_CLASSES_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · Classes{% endblock %}
{% block content %}
{% include "admin/nav.html" %}
<h1>Classes</h1>
<p><a href="/admin/classes/new">New class</a></p>
<table>
{% for class in classes %}
<tr>
    <td><a href="/admin/classes/edit/{{ class.slug }}">{{ class.title.en }}</a><br><span class="muted">{{ class.slug }}</span></td>
    <td>{{ class.level | upper }} · {{ class.status }}</td>
    <td><form method="POST" action="/admin/classes/delete/{{ class.slug }}"><button type="submit">Delete</button></form></td>
</tr>
{% endfor %}
</table>
{% endblock %}"##;

const ADMIN_NEW_POST_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · New post{% endblock %}
{% block content %}
{% include "admin/nav.html" %}
<form class="card" method="POST" action="/admin/blog/new">
    <h1>New post</h1>
    {% for l in languages %}
    <label>Title ({{ l }}) <input name="title-{{ l }}"></label>
    <label>Excerpt ({{ l }}) <textarea name="excerpt-{{ l }}"></textarea></label>
    <label>Content ({{ l }}) <textarea name="content-{{ l }}" rows="8"></textarea></label>
    <label>Tags ({{ l }}, comma separated) <input name="tags-{{ l }}"></label>
    <label>SEO title ({{ l }}) <input name="seo-title-{{ l }}"></label>
    <label>SEO description ({{ l }}) <input name="seo-desc-{{ l }}"></label>
    {% endfor %}
    <label>Author <input name="author"></label>
    <label>Category
        <select name="category"><option>language</option><option>culture</option><option>tips</option></select>
    </label>
    <label>Image URL <input name="imageUrl"></label>
    <label>Image hint <input name="imageHint"></label>
    <button type="submit">Create</button>
</form>
{% endblock %}"##;

const ADMIN_NEW_CLASS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · New class{% endblock %}
{% block content %}
{% include "admin/nav.html" %}
<form class="card" method="POST" action="/admin/classes/new">
    <h1>New class</h1>
    {% for l in languages %}
    <label>Title ({{ l }}) <input name="title-{{ l }}"></label>
    <label>Excerpt ({{ l }}) <textarea name="excerpt-{{ l }}"></textarea></label>
    <label>Description ({{ l }}) <textarea name="description-{{ l }}" rows="6"></textarea></label>
    <label>Objectives ({{ l }}, one per line) <textarea name="objectives-{{ l }}"></textarea></label>
    <label>Prerequisites ({{ l }}, one per line) <textarea name="prerequisites-{{ l }}"></textarea></label>
    <label>Schedule days ({{ l }}) <input name="schedule-days-{{ l }}"></label>
    <label>SEO title ({{ l }}) <input name="seo-title-{{ l }}"></label>
    <label>SEO description ({{ l }}) <input name="seo-desc-{{ l }}"></label>
    {% endfor %}
    <label>Type <select name="type"><option>group</option><option>private</option><option>workshop</option></select></label>
    <label>Level <select name="level"><option>a1</option><option>a2</option><option>b1</option><option>b2</option><option>c1</option><option>c2</option></select></label>
    <label>Status <select name="status"><option>active</option><option>full</option><option>inactive</option></select></label>
    <label>Schedule time <input name="scheduleTime"></label>
    <label>Price <input name="price" type="number" min="0"></label>
    <label>Max students <input name="maxStudents" type="number" min="1"></label>
    <label>Image URL <input name="imageUrl"></label>
    <label>Image hint <input name="imageHint"></label>
    <button type="submit">Create</button>
</form>
{% endblock %}"##;

const ADMIN_JSON_EDITOR_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · {{ heading }}{% endblock %}
{% block content %}
{% include "admin/nav.html" %}
<form class="card" method="POST" action="{{ action }}">
    <h1>{{ heading }}</h1>
    <textarea name="payload" rows="30" spellcheck="false">{{ payload }}</textarea>
    <button type="submit">Save</button>
</form>
{% endblock %}"##;

const ADMIN_MESSAGES_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · Messages{% endblock %}
{% block content %}
{% include "admin/nav.html" %}
<h1>Messages</h1>
{% if messages | length == 0 %}<p class="muted">No messages.</p>{% endif %}
{% for m in messages %}
<div class="card">
    <strong>{{ m.subject }}</strong> · {{ m.name }} &lt;{{ m.email }}&gt;
    <p class="muted">{{ m.submittedAt }}</p>
    <p>{{ m.message }}</p>
    <form method="POST" action="/admin/messages/delete/{{ m.id }}"><button type="submit">Delete</button></form>
</div>
{% endfor %}
{% endblock %}"##;

const ADMIN_REGISTRATIONS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · Registrations{% endblock %}
{% block content %}
{% include "admin/nav.html" %}
<h1>Registrations</h1>
{% if registrations | length == 0 %}<p class="muted">No registrations.</p>{% endif %}
{% for r in registrations %}
<div class="card">
    <strong>{{ r.name }}</strong> &lt;{{ r.email }}&gt; {{ r.phone }} · {{ r.className }}
    <p class="muted">{{ r.submittedAt }}</p>
    {% if r.germanLevel %}<p>Level: {{ r.germanLevel }}</p>{% endif %}
    {% if r.learningGoal %}<p>Goal: {{ r.learningGoal }}</p>{% endif %}
    {% if r.motivation %}<p>Motivation: {{ r.motivation }}</p>{% endif %}
    <form method="POST" action="/admin/registrations/delete/{{ r.id }}"><button type="submit">Delete</button></form>
</div>
{% endfor %}
{% endblock %}"##;

const ADMIN_SETTINGS_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · Settings{% endblock %}
{% block content %}
{% include "admin/nav.html" %}
<h1>Settings</h1>
<div class="card">
    <p>Blob storage: <strong>{% if storage_configured %}configured{% else %}not configured, serving defaults{% endif %}</strong></p>
    <p>Admin credentials: <strong>{% if credentials_from_config %}set by ADMIN_EMAIL / ADMIN_PASSWORD{% else %}stored in blob storage{% endif %}</strong></p>
    <p><a href="/admin/settings/account">Account settings</a></p>
</div>
{% endblock %}"##;

const ADMIN_ACCOUNT_TEMPLATE: &str = r##"{% extends "base.html" %}
{% block title %}Admin · Account{% endblock %}
{% block content %}
{% include "admin/nav.html" %}
<form class="card" method="POST" action="/admin/settings/account">
    <h1>Account</h1>
    {% if credentials_from_config %}<p class="muted">Credentials are set by environment variables; changes will not be saved.</p>{% endif %}
    <label>Email <input name="newEmail" type="email" value="{{ email }}" required></label>
    <label>Current password <input name="currentPassword" type="password" required></label>
    <label>New password <input name="newPassword" type="password"></label>
    <label>Confirm new password <input name="confirmPassword" type="password"></label>
    <button type="submit">Update</button>
</form>
{% endblock %}"##;
